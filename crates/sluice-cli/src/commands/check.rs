use std::path::Path;

use anyhow::{bail, Context, Result};

use sluice_engine::load_dir;

/// Execute the `check` command: parse every job file and report all
/// malformed jobs at once.
pub fn execute(jobs_dir: &Path) -> Result<()> {
    let load = load_dir(jobs_dir)
        .with_context(|| format!("Failed to load jobs from: {}", jobs_dir.display()))?;

    if !load.malformed.is_empty() {
        let lines: Vec<String> = load
            .malformed
            .iter()
            .map(|(id, err)| format!("{id}: {err}"))
            .collect();
        bail!("Job validation failed:\n  - {}", lines.join("\n  - "));
    }

    println!("{} job(s) OK", load.registry.len());
    for job in load.registry.iter() {
        println!(
            "  {} [{}] product={} dependencies=[{}]",
            job.id,
            job.kind(),
            job.product.as_deref().unwrap_or("-"),
            job.dependencies.join(", ")
        );
    }
    Ok(())
}
