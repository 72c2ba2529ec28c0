//! Boundary to the external synchronization engine.
//!
//! The engine owns diffing and write-back; this side packages record
//! collections plus a declarative options bundle into a single request and
//! reads back a report. One call, one outcome: no retry or backoff here.

pub mod http;
pub mod options;

use async_trait::async_trait;
use thiserror::Error;

use rostersync_types::sync::{DirectorySnapshot, GroupQuery, SyncData, SyncReport};

pub use http::HttpSyncEngine;
pub use options::{DataExtractedHook, EnvironmentInfo, SyncOptions, WireOptions};

/// Errors from the engine transport.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),

    #[error("engine transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{context}: engine returned HTTP {status}")]
    Api {
        status: reqwest::StatusCode,
        context: String,
    },
}

/// The external synchronization collaborator.
///
/// Implementations must be cheap to call concurrently: the removal sweep
/// issues many `delete_person` calls at once against a shared reference.
#[async_trait]
pub trait SyncEngine: Send + Sync {
    /// Lightweight reachability check, used by the `check` command.
    async fn ping(&self) -> Result<(), EngineError>;

    /// Read the destination's current state, scoped by the group query.
    async fn extract_destination(
        &self,
        query: &GroupQuery,
    ) -> Result<DirectorySnapshot, EngineError>;

    /// Submit the three record collections plus the wire options bundle for
    /// reconciliation.
    async fn submit(
        &self,
        data: &SyncData,
        options: &WireOptions,
    ) -> Result<SyncReport, EngineError>;

    /// Delete one person by target name.
    async fn delete_person(&self, target_name: &str) -> Result<(), EngineError>;
}
