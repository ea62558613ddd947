//! Job registry: the insertion-ordered set of job definitions for one run.
//!
//! The registry is plumbing, not policy: it supplies the initial pending
//! mapping and guarantees a deterministic iteration order, which is what
//! makes dispatch order reproducible across runs.

use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use sluice_types::{JobDefinition, MalformedJobError};

/// Mapping from job id to definition, iterated in insertion order.
#[derive(Debug, Clone, Default)]
pub struct JobRegistry {
    jobs: IndexMap<String, JobDefinition>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a definition under its id, replacing any previous entry.
    pub fn insert(&mut self, job: JobDefinition) -> Option<JobDefinition> {
        self.jobs.insert(job.id.clone(), job)
    }

    pub fn get(&self, id: &str) -> Option<&JobDefinition> {
        self.jobs.get(id)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Definitions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &JobDefinition> {
        self.jobs.values()
    }

    pub(crate) fn jobs(&self) -> &IndexMap<String, JobDefinition> {
        &self.jobs
    }
}

/// Outcome of loading a jobs directory.
///
/// A malformed file is fatal to that one job only; valid jobs still load.
#[derive(Debug)]
pub struct RegistryLoad {
    pub registry: JobRegistry,
    pub malformed: Vec<(String, MalformedJobError)>,
}

/// Load every `*.json` job file from a directory, in sorted file-name order.
///
/// The file stem is the job id. Sorted order is what fixes registry
/// insertion order, and with it dispatch order, across runs.
///
/// # Errors
///
/// Returns an error if the directory or a job file cannot be read.
/// Per-job parse failures are collected, not fatal.
pub fn load_dir(dir: &Path) -> Result<RegistryLoad> {
    let mut paths: Vec<_> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read jobs directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("Failed to list jobs directory: {}", dir.display()))?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file() && path.extension().is_some_and(|ext| ext == "json")
        })
        .collect();
    paths.sort();

    let mut registry = JobRegistry::new();
    let mut malformed = Vec::new();

    for path in paths {
        let id = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read job file: {}", path.display()))?;
        match JobDefinition::from_json(id.clone(), &content) {
            Ok(job) => {
                registry.insert(job);
            }
            Err(err) => malformed.push((id, err)),
        }
    }

    Ok(RegistryLoad {
        registry,
        malformed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_job(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn loads_jobs_in_sorted_file_name_order() {
        let dir = tempfile::tempdir().unwrap();
        write_job(
            dir.path(),
            "20_build.json",
            r#"{"job_type": "process", "query": "SELECT 2"}"#,
        );
        write_job(
            dir.path(),
            "10_load.json",
            r#"{"job_type": "load", "db_from": "open_api",
                "file_name": "/tmp/a.csv", "product": "raw.a"}"#,
        );

        let load = load_dir(dir.path()).unwrap();
        assert!(load.malformed.is_empty());
        let ids: Vec<_> = load.registry.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids, vec!["10_load", "20_build"]);
    }

    #[test]
    fn malformed_file_is_fatal_to_that_job_only() {
        let dir = tempfile::tempdir().unwrap();
        write_job(dir.path(), "bad.json", r#"{"job_type": "process"}"#);
        write_job(
            dir.path(),
            "good.json",
            r#"{"job_type": "process", "query": "SELECT 1"}"#,
        );

        let load = load_dir(dir.path()).unwrap();
        assert_eq!(load.registry.len(), 1);
        assert!(load.registry.get("good").is_some());
        assert_eq!(load.malformed.len(), 1);
        assert_eq!(load.malformed[0].0, "bad");
    }

    #[test]
    fn non_json_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        write_job(dir.path(), "README.md", "not a job");
        write_job(
            dir.path(),
            "only.json",
            r#"{"job_type": "process", "query": "SELECT 1"}"#,
        );

        let load = load_dir(dir.path()).unwrap();
        assert_eq!(load.registry.len(), 1);
        assert!(load.malformed.is_empty());
    }

    #[test]
    fn missing_directory_errors_with_path() {
        let err = load_dir(Path::new("/nonexistent/jobs")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/jobs"));
    }

    #[test]
    fn insert_replaces_existing_id() {
        let mut registry = JobRegistry::new();
        let first = JobDefinition::from_json(
            "j",
            r#"{"job_type": "process", "query": "SELECT 1"}"#,
        )
        .unwrap();
        let second = JobDefinition::from_json(
            "j",
            r#"{"job_type": "process", "query": "SELECT 2"}"#,
        )
        .unwrap();
        assert!(registry.insert(first).is_none());
        assert!(registry.insert(second).is_some());
        assert_eq!(registry.len(), 1);
    }
}
