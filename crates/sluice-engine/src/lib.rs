//! Dependency-resolution execution engine for sluice job graphs.

pub mod engine;
pub mod executor;
pub mod registry;
pub mod report;

pub use engine::run_jobs;
pub use executor::{JobExecutor, NoopExecutor};
pub use registry::{load_dir, JobRegistry, RegistryLoad};
pub use report::{JobStatus, RunReport};
