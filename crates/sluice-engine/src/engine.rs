//! The dependency-resolution execution pass.
//!
//! Repeatedly scans the pending set for jobs whose dependencies are all
//! available, dispatches each exactly once in registry order, and stops
//! with a deadlock report when a full pass makes no progress. The
//! no-progress check is load-bearing: without it an unsatisfiable
//! dependency would spin the scan forever.

use std::collections::HashSet;

use indexmap::IndexMap;
use sluice_types::JobDefinition;

use crate::executor::JobExecutor;
use crate::registry::JobRegistry;
use crate::report::{JobStatus, RunReport};

/// Execute every job in the registry in an order consistent with declared
/// dependencies, one at a time.
///
/// Run state (the pending mapping and the set of available products) is
/// created here and discarded on return; nothing leaks across invocations.
pub async fn run_jobs<E: JobExecutor>(registry: &JobRegistry, executor: &E) -> RunReport {
    let mut pending: IndexMap<String, JobDefinition> = registry.jobs().clone();
    let mut available_products: HashSet<String> = HashSet::new();
    let mut report = RunReport::default();

    tracing::info!(jobs = pending.len(), "Starting run");

    loop {
        // Iterate a snapshot of ids: jobs are removed mid-pass and removal
        // must not perturb the traversal.
        let snapshot: Vec<String> = pending.keys().cloned().collect();
        let mut progressed = false;

        for id in snapshot {
            let ready = pending.get(&id).is_some_and(|job| {
                job.dependencies
                    .iter()
                    .all(|dep| available_products.contains(dep))
            });
            if !ready {
                continue;
            }
            // shift_remove keeps the remaining entries in registry order.
            let Some(job) = pending.shift_remove(&id) else {
                continue;
            };
            progressed = true;

            tracing::info!(job = %job.id, kind = %job.kind(), "Dispatching job");
            match executor.execute(&job).await {
                Ok(()) => {
                    if let Some(product) = &job.product {
                        available_products.insert(product.clone());
                    }
                    tracing::info!(job = %job.id, "Job completed");
                    report.record(job.id, JobStatus::Completed);
                }
                Err(err) => {
                    // The product stays unavailable: downstream consumers
                    // surface through deadlock detection instead of running
                    // on missing input.
                    tracing::error!(job = %job.id, "Job failed: {err}");
                    report.record(
                        job.id,
                        JobStatus::Failed {
                            reason: err.to_string(),
                        },
                    );
                }
            }
        }

        if pending.is_empty() {
            break;
        }
        if !progressed {
            tracing::error!(
                stalled = pending.len(),
                "No job became ready in a full pass; remaining dependencies can never be satisfied"
            );
            report.mark_deadlocked();
            for (id, job) in &pending {
                let unmet: Vec<String> = job
                    .dependencies
                    .iter()
                    .filter(|dep| !available_products.contains(*dep))
                    .cloned()
                    .collect();
                tracing::error!(job = %id, unmet = ?unmet, "Job never ran");
                report.record(
                    id.clone(),
                    JobStatus::NeverRan {
                        unmet_dependencies: unmet,
                    },
                );
            }
            break;
        }
    }

    report
}
