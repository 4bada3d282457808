//! Search core configuration.
//!
//! The core is configured once at process start and shared by reference: the
//! backend endpoint and index name, plus the embedding provider settings.
//! Values load from an optional `prodsearch` config file overridden by
//! `PRODSEARCH_*` environment variables (`__` separates nesting, e.g.
//! `PRODSEARCH_EMBEDDING__API_URL`).

use serde::{Deserialize, Serialize};

/// Configuration for the search core.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Search backend base URL. Unset means no backend is configured; the
    /// service then serves errors for searches and a sentinel total count.
    #[serde(default)]
    pub backend_endpoint: Option<String>,

    /// API key sent as `Authorization: ApiKey <key>` on backend calls.
    #[serde(default)]
    pub backend_api_key: Option<String>,

    /// Product index to query.
    #[serde(default = "default_index")]
    pub index: String,

    /// Outbound request timeout in seconds for backend and embedding calls.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Embedding provider settings.
    #[serde(default)]
    pub embedding: EmbedConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            backend_endpoint: None,
            backend_api_key: None,
            index: default_index(),
            timeout_secs: default_timeout_secs(),
            embedding: EmbedConfig::default(),
        }
    }
}

impl SearchConfig {
    /// Load configuration from file and environment.
    pub fn load() -> anyhow::Result<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("prodsearch").required(false))
            .add_source(config::Environment::with_prefix("PRODSEARCH").separator("__"));

        Ok(builder.build()?.try_deserialize()?)
    }
}

/// Embedding provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmbedConfig {
    /// Embedding model endpoint. Unset makes every embedding call fail,
    /// which downgrades all searches to the keyword path.
    #[serde(default)]
    pub api_url: Option<String>,

    /// Payload dialect: `titan`, `openai`, or `custom`.
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model identifier, passed through to providers that want it in the
    /// request body.
    #[serde(default = "default_model")]
    pub model: String,

    /// Full `Authorization` header value for the embedding endpoint.
    #[serde(default)]
    pub api_auth_header: Option<String>,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            provider: default_provider(),
            model: default_model(),
            api_auth_header: None,
        }
    }
}

fn default_index() -> String {
    "ecommerce-products".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_provider() -> String {
    "titan".to_string()
}

fn default_model() -> String {
    "amazon.titan-embed-text-v1".to_string()
}
