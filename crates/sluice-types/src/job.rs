//! Job source records and validated job definitions.
//!
//! [`JobSpec`] mirrors the on-disk JSON record one-to-one; [`JobDefinition`]
//! is the validated form the engine and executor work with. Conversion is
//! the single place kind-specific required fields are enforced.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::MalformedJobError;

/// Which executor operation applies to a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    /// Fetch external data and bulk-load it into the target relation.
    Load,
    /// Run a transformation against already-loaded data.
    Process,
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Load => "load",
            Self::Process => "process",
        })
    }
}

/// Raw job source record, one JSON file per job.
///
/// `job_type` stays a plain string here so an unrecognized kind surfaces as
/// [`MalformedJobError::UnknownKind`] instead of an opaque serde error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSpec {
    pub job_type: String,
    #[serde(default)]
    pub db_from: Option<String>,
    #[serde(default)]
    pub file_name: Option<PathBuf>,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub dependencies: Option<Vec<String>>,
    #[serde(default)]
    pub ddl: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
}

/// Immutable, validated description of one unit of work.
#[derive(Debug, Clone, PartialEq)]
pub struct JobDefinition {
    /// Unique within a run; derived from the source file name.
    pub id: String,
    /// Identifier this job contributes once it completes; `None` for pure
    /// side-effecting jobs with no downstream consumers.
    pub product: Option<String>,
    /// Product identifiers required before this job may run. Empty means
    /// no prerequisites.
    pub dependencies: Vec<String>,
    /// Kind-specific parameters, opaque to the engine.
    pub payload: JobPayload,
}

/// Kind-specific job parameters. One handler per variant in the executor;
/// adding a kind is a compile-time-checked extension.
#[derive(Debug, Clone, PartialEq)]
pub enum JobPayload {
    Load(LoadJob),
    Process(ProcessJob),
}

/// Parameters for a load job: fetch, write the intermediate file, bulk-load.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadJob {
    /// Source kind (`db_from` in the job record), resolved by the executor.
    pub source: String,
    /// Path of the durable intermediate file.
    pub file_name: PathBuf,
    /// Target relation; also the job's product identifier.
    pub table: String,
    /// Optional schema statement executed before the load.
    pub ddl: Option<String>,
}

/// Parameters for a process job.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessJob {
    /// Transformation statement with an optional `{work_date}` placeholder.
    pub query: String,
}

impl JobDefinition {
    /// Validate a raw job record into a definition.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedJobError`] when `job_type` is unknown or a field
    /// required for the declared kind is missing.
    pub fn from_spec(id: impl Into<String>, spec: JobSpec) -> Result<Self, MalformedJobError> {
        let payload = match spec.job_type.as_str() {
            "load" => {
                let source = spec.db_from.ok_or(MalformedJobError::MissingField {
                    kind: JobKind::Load,
                    field: "db_from",
                })?;
                let file_name = spec.file_name.ok_or(MalformedJobError::MissingField {
                    kind: JobKind::Load,
                    field: "file_name",
                })?;
                let table = spec
                    .product
                    .clone()
                    .ok_or(MalformedJobError::MissingField {
                        kind: JobKind::Load,
                        field: "product",
                    })?;
                JobPayload::Load(LoadJob {
                    source,
                    file_name,
                    table,
                    ddl: spec.ddl,
                })
            }
            "process" => {
                let query = spec.query.ok_or(MalformedJobError::MissingField {
                    kind: JobKind::Process,
                    field: "query",
                })?;
                JobPayload::Process(ProcessJob { query })
            }
            other => return Err(MalformedJobError::UnknownKind(other.to_string())),
        };

        Ok(Self {
            id: id.into(),
            product: spec.product,
            dependencies: spec.dependencies.unwrap_or_default(),
            payload,
        })
    }

    /// Parse and validate a raw JSON job record.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedJobError`] on invalid JSON or failed validation.
    pub fn from_json(id: impl Into<String>, json: &str) -> Result<Self, MalformedJobError> {
        let spec: JobSpec = serde_json::from_str(json)?;
        Self::from_spec(id, spec)
    }

    /// The executor operation this job routes to.
    pub fn kind(&self) -> JobKind {
        match self.payload {
            JobPayload::Load(_) => JobKind::Load,
            JobPayload::Process(_) => JobKind::Process,
        }
    }
}
