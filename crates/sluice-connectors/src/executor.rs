//! The concrete job executor: routes load and process jobs to the
//! connector operations.

use chrono::NaiveDate;

use sluice_engine::JobExecutor;
use sluice_types::{ExecutionError, JobDefinition, JobPayload, LoadJob, ProcessJob};

use crate::{intermediate, open_api, postgres};

/// Closed set of load-source kinds. One handler per variant; adding a
/// source kind is a compile-time-checked extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// Public API catalogue over HTTP.
    OpenApi,
}

impl LoadSource {
    /// Resolve a job record's `db_from` value.
    ///
    /// # Errors
    ///
    /// An unrecognized kind is an execution failure, never a silent skip:
    /// skipping would make a misconfigured job look like a dependency
    /// deadlock on its product.
    pub fn parse(source: &str) -> Result<Self, ExecutionError> {
        match source {
            "open_api" => Ok(Self::OpenApi),
            other => Err(ExecutionError::UnsupportedSource(other.to_string())),
        }
    }
}

/// Executor backed by the real connectors, scoped to one run's work date.
pub struct TransferExecutor {
    database_url: String,
    work_date: NaiveDate,
    http: reqwest::Client,
}

impl TransferExecutor {
    pub fn new(database_url: impl Into<String>, work_date: NaiveDate) -> Self {
        Self {
            database_url: database_url.into(),
            work_date,
            http: reqwest::Client::new(),
        }
    }

    /// Fetch, write the intermediate file, bulk-load, clean up.
    async fn run_load(&self, load: &LoadJob) -> Result<(), ExecutionError> {
        let rows: Vec<Vec<String>> = match LoadSource::parse(&load.source)? {
            LoadSource::OpenApi => {
                let entries = open_api::fetch_entries(&self.http).await?;
                entries
                    .iter()
                    .map(|entry| entry.to_record(self.work_date))
                    .collect()
            }
        };

        intermediate::write_intermediate(&load.file_name, &open_api::COLUMNS, &rows)?;

        let mut client = postgres::connect(&self.database_url).await?;
        let loaded = postgres::bulk_load(
            &mut client,
            &load.table,
            load.ddl.as_deref(),
            &load.file_name,
        )
        .await?;
        tracing::info!(table = %load.table, rows = loaded, "Bulk load committed");

        // Cleaned up only after a successful load; on failure the file
        // stays behind for inspection.
        std::fs::remove_file(&load.file_name)?;
        Ok(())
    }

    async fn run_process(&self, process: &ProcessJob) -> Result<(), ExecutionError> {
        let query = substitute_work_date(&process.query, self.work_date);
        let client = postgres::connect(&self.database_url).await?;
        postgres::run_transform(&client, &query).await
    }
}

impl JobExecutor for TransferExecutor {
    async fn execute(&self, job: &JobDefinition) -> Result<(), ExecutionError> {
        match &job.payload {
            JobPayload::Load(load) => self.run_load(load).await,
            JobPayload::Process(process) => self.run_process(process).await,
        }
    }
}

/// Substitute the run work date for every `{work_date}` placeholder. The
/// work date is the only supported template value.
pub fn substitute_work_date(query: &str, work_date: NaiveDate) -> String {
    query.replace("{work_date}", &work_date.to_string())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn known_source_parses() {
        assert_eq!(LoadSource::parse("open_api").unwrap(), LoadSource::OpenApi);
    }

    #[test]
    fn unrecognized_source_is_an_execution_error() {
        let err = LoadSource::parse("other_db_type").unwrap_err();
        match err {
            ExecutionError::UnsupportedSource(kind) => assert_eq!(kind, "other_db_type"),
            other => panic!("expected UnsupportedSource, got: {other}"),
        }
    }

    #[test]
    fn work_date_substitution_replaces_every_occurrence() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let query = "DELETE FROM mart.daily WHERE work_date = '{work_date}'; \
                     INSERT INTO mart.daily SELECT * FROM raw.api_entries \
                     WHERE work_date = '{work_date}'";
        let substituted = substitute_work_date(query, date);
        assert!(!substituted.contains("{work_date}"));
        assert_eq!(substituted.matches("2024-03-01").count(), 2);
    }

    #[test]
    fn query_without_placeholder_passes_through() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let query = "REFRESH MATERIALIZED VIEW mart.report";
        assert_eq!(substitute_work_date(query, date), query);
    }

    #[tokio::test]
    async fn load_with_unknown_source_fails_before_any_side_effect() {
        let dir = tempfile::tempdir().unwrap();
        let file_name = dir.path().join("never_written.csv");
        let executor = TransferExecutor::new(
            "postgres://loader@localhost:5432/postgres",
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        );
        let job = JobDefinition {
            id: "bad_source".to_string(),
            product: Some("raw.other".to_string()),
            dependencies: Vec::new(),
            payload: JobPayload::Load(sluice_types::LoadJob {
                source: "other_db_type".to_string(),
                file_name: PathBuf::from(&file_name),
                table: "raw.other".to_string(),
                ddl: None,
            }),
        };

        let err = executor.execute(&job).await.unwrap_err();
        assert!(matches!(err, ExecutionError::UnsupportedSource(_)));
        assert!(!file_name.exists());
    }
}
