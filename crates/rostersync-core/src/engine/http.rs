//! HTTP implementation of the sync-engine boundary (reqwest-based).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use tracing::debug;

use rostersync_types::sync::{DirectorySnapshot, GroupQuery, SyncData, SyncReport};

use crate::config::types::EnvironmentConfig;
use crate::engine::options::WireOptions;
use crate::engine::{EngineError, SyncEngine};

/// One sync request on the wire: the record collections plus the options
/// bundle, in a single body.
#[derive(Debug, Serialize)]
struct SyncRequest<'a> {
    #[serde(flatten)]
    data: &'a SyncData,
    options: &'a WireOptions,
}

/// Sync engine reachable over HTTPS with bearer-token auth.
#[derive(Debug, Clone)]
pub struct HttpSyncEngine {
    base_url: Url,
    api_key: String,
    http_client: Client,
}

impl HttpSyncEngine {
    /// Create a new engine client.
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, EngineError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("rostersync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| EngineError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;
        Self::with_http_client(base_url, api_key, http_client)
    }

    /// Create an engine client from job environment configuration.
    pub fn from_environment(env: &EnvironmentConfig) -> Result<Self, EngineError> {
        Self::new(
            &env.base_url,
            &env.api_key,
            Duration::from_secs(env.timeout_secs),
        )
    }

    /// Create a client with a pre-built `reqwest::Client` (for testing).
    pub fn with_http_client(
        base_url: &str,
        api_key: &str,
        http_client: Client,
    ) -> Result<Self, EngineError> {
        // Normalize base URL: strip trailing slash so joins are predictable.
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| EngineError::InvalidConfig(format!("invalid base_url: {e}")))?;
        Ok(Self {
            base_url,
            api_key: api_key.to_string(),
            http_client,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, EngineError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| EngineError::InvalidConfig("base_url cannot be a base".into()))?;
            path.extend(["api", "v1"]);
            path.extend(segments);
        }
        Ok(url)
    }

    fn check_status(status: StatusCode, context: &str) -> Result<(), EngineError> {
        if status.is_success() {
            Ok(())
        } else {
            Err(EngineError::Api {
                status,
                context: context.to_string(),
            })
        }
    }
}

#[async_trait]
impl SyncEngine for HttpSyncEngine {
    async fn ping(&self) -> Result<(), EngineError> {
        let url = self.endpoint(&["ping"])?;
        let response = self
            .http_client
            .get(url)
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        Self::check_status(response.status(), "ping failed")
    }

    async fn extract_destination(
        &self,
        query: &GroupQuery,
    ) -> Result<DirectorySnapshot, EngineError> {
        let url = self.endpoint(&["directory"])?;
        debug!(search = %query.search, "Extracting destination snapshot");
        let response = self
            .http_client
            .get(url)
            .bearer_auth(&self.api_key)
            .query(&[("search", query.search.as_str())])
            .send()
            .await?;
        Self::check_status(response.status(), "destination extraction failed")?;
        Ok(response.json().await?)
    }

    async fn submit(
        &self,
        data: &SyncData,
        options: &WireOptions,
    ) -> Result<SyncReport, EngineError> {
        let url = self.endpoint(&["sync"])?;
        debug!(
            people = data.people.len(),
            groups = data.groups.len(),
            devices = data.devices.len(),
            "Submitting sync request"
        );
        let response = self
            .http_client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&SyncRequest { data, options })
            .send()
            .await?;
        Self::check_status(response.status(), "sync submission failed")?;
        Ok(response.json().await?)
    }

    async fn delete_person(&self, target_name: &str) -> Result<(), EngineError> {
        let url = self.endpoint(&["people", target_name])?;
        debug!(target_name, "Deleting person");
        let response = self
            .http_client
            .delete(url)
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        Self::check_status(
            response.status(),
            &format!("delete of '{target_name}' failed"),
        )
    }
}
