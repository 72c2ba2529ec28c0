use std::path::Path;

use anyhow::{Context, Result};

use rostersync_core::config::{parser, validator};
use rostersync_core::engine::HttpSyncEngine;
use rostersync_core::orchestrator;

/// Execute the `run` command: parse, validate, and run a sync job.
pub async fn execute(job_path: &Path) -> Result<()> {
    // 1. Parse job YAML
    let config = parser::parse_job(job_path)
        .with_context(|| format!("Failed to parse job: {}", job_path.display()))?;

    // 2. Validate
    validator::validate_job(&config)?;

    tracing::info!(
        job = %config.job,
        subdomain = %config.environment.subdomain,
        people = %config.people.path.display(),
        groups = %config.groups.path.display(),
        "Job validated"
    );

    // 3. Run
    let engine = HttpSyncEngine::from_environment(&config.environment)?;
    let summary = orchestrator::run_job(&config, &engine).await?;

    if summary.sync_failed {
        println!("Job '{}' sync failed.", config.job);
        for message in &summary.sync_errors {
            println!("  error: {message}");
        }
        println!("  Removal sweep skipped ({} queued).", summary.removals_queued);
        anyhow::bail!("Sync reported failure");
    }

    println!("Job '{}' completed.", config.job);
    println!("  People synced:   {}", summary.people);
    println!("  Devices synced:  {}", summary.devices);
    println!("  Groups synced:   {}", summary.groups);
    println!("  People removed:  {}", summary.deleted);
    if !summary.delete_failures.is_empty() {
        println!("  Failed removals: {}", summary.delete_failures.len());
        for failure in &summary.delete_failures {
            println!("    {}: {}", failure.target_name, failure.error);
        }
        anyhow::bail!("One or more removals failed");
    }

    Ok(())
}
