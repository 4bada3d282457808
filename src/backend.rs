//! Search index backend client.
//!
//! The backend is consumed strictly through its request/response contract: a
//! built [`QuerySpec`](crate::query::QuerySpec) goes out, raw response JSON
//! comes back. Interpretation of the hits lives in [`crate::hits`] so the
//! client stays transport-only.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::SearchConfig;
use crate::error::BackendError;
use crate::query::QuerySpec;

/// Executes built queries against the search index. Shared read-mostly
/// across requests; implementations must be safe for concurrent use.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn execute(&self, query: &QuerySpec) -> Result<Value, BackendError>;
}

/// HTTP client for an Elasticsearch-compatible search endpoint.
///
/// Holds its own pooled connection handle; construct once at process start
/// and share by reference.
pub struct HttpBackend {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpBackend {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(32)
            .build()
            .map_err(|e| BackendError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Build a backend from configuration. `Ok(None)` means no endpoint was
    /// configured at all, which callers treat as "backend absent" rather
    /// than an error.
    pub fn from_config(cfg: &SearchConfig) -> Result<Option<Self>, BackendError> {
        match cfg.backend_endpoint.as_deref() {
            Some(endpoint) => Ok(Some(Self::new(
                endpoint,
                cfg.backend_api_key.clone(),
                cfg.timeout_secs,
            )?)),
            None => {
                tracing::warn!("no search backend endpoint configured");
                Ok(None)
            }
        }
    }

    fn search_url(&self, index: &str) -> String {
        format!("{}/{}/_search", self.endpoint, index)
    }
}

#[async_trait]
impl SearchBackend for HttpBackend {
    async fn execute(&self, query: &QuerySpec) -> Result<Value, BackendError> {
        let mut request = self
            .client
            .post(self.search_url(&query.index))
            .header("Content-Type", "application/json");
        if let Some(key) = self.api_key.as_deref() {
            request = request.header("Authorization", format!("ApiKey {key}"));
        }

        let response = request
            .json(&query.body)
            .send()
            .await
            .map_err(|e| BackendError::Request(format!("HTTP request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status { status, body });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| BackendError::MalformedResponse(format!("invalid JSON response: {e}")))
    }
}
