//! Shared error types for registry loading and job execution.

use crate::job::JobKind;

/// A job source file could not be parsed into a valid job definition.
///
/// Registry-level and fatal to that one job only; the loader reports it
/// alongside the job id and keeps loading the rest.
#[derive(Debug, thiserror::Error)]
pub enum MalformedJobError {
    /// The file is not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// `job_type` names no known kind.
    #[error("unknown job_type '{0}'")]
    UnknownKind(String),

    /// A field required for the declared kind is absent.
    #[error("{kind} job missing required field '{field}'")]
    MissingField { kind: JobKind, field: &'static str },
}

/// An executor call failed.
///
/// Recorded in the run report and never retried; the failed job's product
/// is not made available, so downstream consumers surface through deadlock
/// detection rather than running on missing input.
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    /// `db_from` names no known load source. Explicit by design: a silent
    /// skip would make a misconfigured job look like a dependency deadlock.
    #[error("unsupported load source '{0}'")]
    UnsupportedSource(String),

    /// Remote source fetch or decode failure.
    #[error("source fetch failed: {0}")]
    Fetch(String),

    /// Intermediate file I/O failure.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Connection, DDL, truncate, or COPY failure.
    #[error("database error: {0}")]
    Database(String),

    /// Transformation statement failure.
    #[error("transform failed: {0}")]
    Transform(String),
}
