//! Removal sweep: delete every queued person after a successful sync.
//!
//! All deletes are dispatched together and jointly awaited. Outcomes are
//! collected per item; one failure never blocks or cancels the rest.

use futures_util::future::join_all;
use tracing::{info, warn};

use crate::engine::SyncEngine;

/// One failed delete.
#[derive(Debug, Clone)]
pub struct SweepFailure {
    pub target_name: String,
    pub error: String,
}

/// Aggregated sweep outcome.
#[derive(Debug, Clone, Default)]
pub struct SweepSummary {
    pub deleted: usize,
    pub failures: Vec<SweepFailure>,
}

impl SweepSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Delete every queued target name, concurrently, collecting per-item
/// outcomes. Duplicate queue entries are collapsed so the engine sees at
/// most one delete per target name.
pub async fn sweep_removals(engine: &dyn SyncEngine, removals: &[String]) -> SweepSummary {
    let mut unique: Vec<&String> = Vec::new();
    for target_name in removals {
        if !unique.contains(&target_name) {
            unique.push(target_name);
        }
    }

    let deletes = unique.iter().map(|target_name| async move {
        let result = engine.delete_person(target_name).await;
        (target_name.as_str(), result)
    });
    let outcomes = join_all(deletes).await;

    let mut summary = SweepSummary::default();
    for (target_name, result) in outcomes {
        match result {
            Ok(()) => {
                info!(target_name, "Removed person");
                summary.deleted += 1;
            }
            Err(e) => {
                warn!(target_name, error = %e, "Failed to remove person");
                summary.failures.push(SweepFailure {
                    target_name: target_name.to_string(),
                    error: e.to_string(),
                });
            }
        }
    }
    summary
}
