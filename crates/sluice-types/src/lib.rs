//! Core job model shared by the sluice engine, connectors, and CLI.

pub mod error;
pub mod job;

pub use error::{ExecutionError, MalformedJobError};
pub use job::{JobDefinition, JobKind, JobPayload, JobSpec, LoadJob, ProcessJob};
