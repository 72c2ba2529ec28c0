use std::path::Path;

use anyhow::{Context, Result};

use rostersync_core::config::types::JobConfig;
use rostersync_core::config::{parser, validator};
use rostersync_core::engine::{HttpSyncEngine, SyncEngine};
use rostersync_core::mapper::REQUIRED_PEOPLE_COLUMNS;

/// Execute the `check` command: validate job config, input files, and
/// engine connectivity.
pub async fn execute(job_path: &Path) -> Result<()> {
    // 1. Parse job YAML
    let config = parser::parse_job(job_path)
        .with_context(|| format!("Failed to parse job: {}", job_path.display()))?;

    // 2. Validate job structure
    validator::validate_job(&config)?;
    println!("Job structure:   OK");

    // 3. Check input files
    let people_ok = report_check("People file:", check_people_file(&config));
    let groups_ok = report_check("Groups file:", check_groups_file(&config));

    // 4. Check engine reachability
    let engine = HttpSyncEngine::from_environment(&config.environment)?;
    let engine_ok = report_check("Engine:", engine.ping().await.map_err(Into::into));

    if people_ok && groups_ok && engine_ok {
        println!("\nAll checks passed.");
        Ok(())
    } else {
        anyhow::bail!("One or more checks failed")
    }
}

fn report_check(label: &str, result: Result<()>) -> bool {
    match result {
        Ok(()) => {
            println!("{label:16} OK");
            true
        }
        Err(e) => {
            println!("{label:16} FAILED ({e:#})");
            false
        }
    }
}

fn check_people_file(config: &JobConfig) -> Result<()> {
    if !config.people.enabled {
        return Ok(());
    }
    let mut reader = csv::Reader::from_path(&config.people.path)
        .with_context(|| format!("cannot open {}", config.people.path.display()))?;
    let headers = reader.headers().context("cannot read headers")?.clone();
    let missing: Vec<&str> = REQUIRED_PEOPLE_COLUMNS
        .iter()
        .filter(|name| !headers.iter().any(|h| h.trim() == **name))
        .copied()
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        anyhow::bail!("missing column(s): {}", missing.join(", "))
    }
}

fn check_groups_file(config: &JobConfig) -> Result<()> {
    if !config.groups.enabled {
        return Ok(());
    }
    let mut reader = csv::Reader::from_path(&config.groups.path)
        .with_context(|| format!("cannot open {}", config.groups.path.display()))?;
    let headers = reader.headers().context("cannot read headers")?;
    if !headers.iter().any(|h| h.trim() == "targetName") {
        anyhow::bail!("missing column: targetName");
    }
    Ok(())
}
