//! Run report: per-job outcomes of one engine invocation.

use indexmap::IndexMap;

/// Terminal status of one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    /// Dispatched and executed successfully.
    Completed,
    /// Dispatched; the executor reported a failure. Not retried.
    Failed { reason: String },
    /// Still pending when the run deadlocked; `unmet_dependencies` lists
    /// the product identifiers that never became available.
    NeverRan { unmet_dependencies: Vec<String> },
}

/// Per-job outcome of one `run_jobs` invocation.
///
/// Entries appear in dispatch order; after a deadlock, never-ran jobs are
/// appended in registry order.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    statuses: IndexMap<String, JobStatus>,
    deadlocked: bool,
}

impl RunReport {
    pub(crate) fn record(&mut self, id: String, status: JobStatus) {
        self.statuses.insert(id, status);
    }

    pub(crate) fn mark_deadlocked(&mut self) {
        self.deadlocked = true;
    }

    /// True when a full pass made no progress with jobs still pending.
    pub fn deadlocked(&self) -> bool {
        self.deadlocked
    }

    /// Every job's status, in dispatch order.
    pub fn statuses(&self) -> impl Iterator<Item = (&str, &JobStatus)> {
        self.statuses.iter().map(|(id, status)| (id.as_str(), status))
    }

    pub fn status(&self, id: &str) -> Option<&JobStatus> {
        self.statuses.get(id)
    }

    /// Ids of completed jobs, in dispatch order.
    pub fn completed(&self) -> impl Iterator<Item = &str> {
        self.statuses.iter().filter_map(|(id, status)| {
            matches!(status, JobStatus::Completed).then_some(id.as_str())
        })
    }

    pub fn failed_count(&self) -> usize {
        self.statuses
            .values()
            .filter(|status| matches!(status, JobStatus::Failed { .. }))
            .count()
    }

    pub fn never_ran_count(&self) -> usize {
        self.statuses
            .values()
            .filter(|status| matches!(status, JobStatus::NeverRan { .. }))
            .count()
    }

    /// True when every job completed and the run did not deadlock.
    pub fn is_success(&self) -> bool {
        !self.deadlocked
            && self
                .statuses
                .values()
                .all(|status| matches!(status, JobStatus::Completed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report_is_success() {
        let report = RunReport::default();
        assert!(report.is_success());
        assert_eq!(report.failed_count(), 0);
    }

    #[test]
    fn failed_job_breaks_success() {
        let mut report = RunReport::default();
        report.record("a".to_string(), JobStatus::Completed);
        report.record(
            "b".to_string(),
            JobStatus::Failed {
                reason: "boom".to_string(),
            },
        );
        assert!(!report.is_success());
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.completed().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn statuses_preserve_dispatch_order() {
        let mut report = RunReport::default();
        report.record("z".to_string(), JobStatus::Completed);
        report.record("a".to_string(), JobStatus::Completed);
        let ids: Vec<_> = report.statuses().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["z", "a"]);
    }
}
