//! Concrete connectors behind the sluice job executor: open-API fetch,
//! pipe-delimited intermediate files, and PostgreSQL bulk load/transform.

pub mod executor;
pub mod intermediate;
pub mod open_api;
pub mod postgres;

pub use executor::{LoadSource, TransferExecutor};
