//! Executor capability the engine dispatches jobs to.

use sluice_types::{ExecutionError, JobDefinition};

/// Capability that runs one job to completion.
///
/// The engine is kind-agnostic beyond routing: it hands over the whole
/// definition, awaits the call, and only needs to know whether execution
/// succeeded. One job runs at a time; implementations never see concurrent
/// calls within a run.
#[allow(async_fn_in_trait)]
pub trait JobExecutor {
    /// Run the job's side effects.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError`] on any fetch, file, or database failure;
    /// the engine records it and moves on without retrying.
    async fn execute(&self, job: &JobDefinition) -> Result<(), ExecutionError>;
}

/// Executor that succeeds without side effects.
///
/// Backs `run --dry-run` (print the dispatch plan, touch nothing) and
/// engine tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopExecutor;

impl JobExecutor for NoopExecutor {
    async fn execute(&self, _job: &JobDefinition) -> Result<(), ExecutionError> {
        Ok(())
    }
}
