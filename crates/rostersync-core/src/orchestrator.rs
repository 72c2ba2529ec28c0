//! The run orchestrator: one forward pass from CSV files to sync outcome.
//!
//! Stages: map the people file, load raw groups, extract the destination
//! snapshot, persist the backup, run the group pipeline, submit the sync
//! request, then either report captured errors (sync failure) or run the
//! removal sweep.

use anyhow::{Context, Result};
use tracing::{error, info};

use rostersync_types::sync::SyncData;

use crate::config::types::JobConfig;
use crate::engine::options::{build_sync_options, EnvironmentInfo};
use crate::engine::SyncEngine;
use crate::sweep::{sweep_removals, SweepFailure};
use crate::{groups, mapper};

/// Outcome of one job run, printed by the CLI.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub people: usize,
    pub devices: usize,
    pub groups: usize,
    pub removals_queued: usize,
    pub sync_failed: bool,
    pub sync_errors: Vec<String>,
    pub deleted: usize,
    pub delete_failures: Vec<SweepFailure>,
}

impl RunSummary {
    /// True when the sync succeeded and every queued delete went through.
    pub fn success(&self) -> bool {
        !self.sync_failed && self.delete_failures.is_empty()
    }
}

/// Run one sync job against the given engine.
///
/// Input-stage errors (unreadable files, malformed CSV, unknown language
/// names) abort the run. A sync failure is not an `Err`: it is reported in
/// the summary, and the removal sweep is skipped.
pub async fn run_job(config: &JobConfig, engine: &dyn SyncEngine) -> Result<RunSummary> {
    let options = build_sync_options(config);
    let env_info = EnvironmentInfo {
        subdomain: config.environment.subdomain.clone(),
        base_url: config.environment.base_url.clone(),
    };

    info!(job = %config.job, subdomain = %env_info.subdomain, "Starting sync job");

    // 1. Map the people file into person + device records.
    let roster = if options.people {
        mapper::map_people_file(&config.people.path)
            .with_context(|| format!("Failed to map people file: {}", config.people.path.display()))?
    } else {
        mapper::MappedRoster::default()
    };
    info!(
        people = roster.people.len(),
        devices = roster.devices.len(),
        removals = roster.removals.len(),
        "Mapped people file"
    );

    // 2. Load raw group rows.
    let raw_groups = if options.groups {
        groups::load_groups_file(&config.groups.path)?
    } else {
        Vec::new()
    };

    // 3. Extract the destination snapshot (pre-sync state).
    let snapshot = engine
        .extract_destination(&options.groups_query)
        .await
        .context("Failed to extract destination snapshot")?;
    info!(
        groups = snapshot.groups.len(),
        "Extracted destination snapshot"
    );

    // 4. Hand the snapshot to the data-extracted hook before any write-back.
    if let Some(hook) = &options.data_extracted {
        hook(&snapshot, &env_info)?;
    }

    // 5. Group pipeline: projection -> filter -> decoration.
    let mut data = SyncData {
        people: roster.people,
        devices: if options.devices { roster.devices } else { Vec::new() },
        groups: Vec::new(),
    };
    let prepared = groups::prepare_groups(raw_groups, &options, &data, &snapshot);
    data.groups = prepared;

    let mut summary = RunSummary {
        people: data.people.len(),
        devices: data.devices.len(),
        groups: data.groups.len(),
        removals_queued: roster.removals.len(),
        ..Default::default()
    };

    // 6. Single sync call, single outcome.
    let report = engine
        .submit(&data, &options.wire())
        .await
        .context("Sync request failed")?;

    if report.failure {
        summary.sync_failed = true;
        summary.sync_errors = report.errors.into_iter().map(|e| e.message).collect();
        for message in &summary.sync_errors {
            error!(message = %message, "Sync error");
        }
        error!(
            errors = summary.sync_errors.len(),
            "Sync failed, skipping removal sweep"
        );
        return Ok(summary);
    }

    // 7. Removal sweep, only after a successful sync.
    let sweep = sweep_removals(engine, &roster.removals).await;
    summary.deleted = sweep.deleted;
    summary.delete_failures = sweep.failures;

    info!(
        people = summary.people,
        devices = summary.devices,
        groups = summary.groups,
        deleted = summary.deleted,
        delete_failures = summary.delete_failures.len(),
        "Sync job finished"
    );

    Ok(summary)
}
