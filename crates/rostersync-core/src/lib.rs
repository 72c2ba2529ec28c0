//! Core pipeline for rostersync: config loading, CSV-to-record mapping, the
//! group filter/transform pipeline, the sync-engine boundary, and the run
//! orchestrator.

pub mod backup;
pub mod config;
pub mod engine;
pub mod groups;
pub mod mapper;
pub mod orchestrator;
pub mod sweep;

// Re-export public API for convenience
pub use engine::{EngineError, HttpSyncEngine, SyncEngine, SyncOptions, WireOptions};
pub use mapper::{MapError, MappedRoster};
pub use orchestrator::{run_job, RunSummary};
pub use sweep::{SweepFailure, SweepSummary};
