//! Embedding provider: free text in, fixed-length vector out.
//!
//! The provider is a thin contract over an external model endpoint. It does
//! not retry; the fallback policy lives with the orchestrator so this layer
//! keeps a single responsibility.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::config::EmbedConfig;
use crate::error::EmbedError;

/// Turns query text into an embedding vector. Implementations may suspend on
/// network I/O and must be safe to share across concurrent requests.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError>;
}

/// Request payload dialect of the embedding endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProviderKind {
    Titan,
    OpenAi,
    Custom,
}

impl ProviderKind {
    fn parse(provider: &str) -> Self {
        match provider.to_ascii_lowercase().as_str() {
            "titan" | "bedrock" => ProviderKind::Titan,
            "openai" | "gpt" => ProviderKind::OpenAi,
            _ => ProviderKind::Custom,
        }
    }
}

/// HTTP client for an external embedding model.
///
/// Holds its own pooled connection handle; construct once at process start
/// and share by reference. Missing configuration surfaces at call time so a
/// process without an embedding endpoint still serves keyword searches.
pub struct HttpEmbedder {
    client: reqwest::Client,
    cfg: EmbedConfig,
    kind: ProviderKind,
}

impl HttpEmbedder {
    pub fn new(cfg: EmbedConfig, timeout_secs: u64) -> Result<Self, EmbedError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(32)
            .build()
            .map_err(|e| EmbedError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;

        let kind = ProviderKind::parse(&cfg.provider);
        Ok(Self { client, cfg, kind })
    }

    fn payload(&self, text: &str) -> Value {
        match self.kind {
            ProviderKind::Titan => json!({ "inputText": text }),
            ProviderKind::OpenAi => json!({ "input": text, "model": self.cfg.model }),
            ProviderKind::Custom => json!({ "text": text }),
        }
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let url = self
            .cfg
            .api_url
            .as_deref()
            .ok_or_else(|| EmbedError::InvalidConfig("embedding api_url is not set".into()))?;

        let mut request = self
            .client
            .post(url)
            .header("Content-Type", "application/json");
        if let Some(header) = self.cfg.api_auth_header.as_deref() {
            request = request.header("Authorization", header);
        }

        let response = request
            .json(&self.payload(text))
            .send()
            .await
            .map_err(|e| EmbedError::Request(format!("HTTP request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(EmbedError::Request(format!("HTTP error {status}: {body}")));
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| EmbedError::MalformedResponse(format!("invalid JSON response: {e}")))?;

        parse_embedding(body)
    }
}

/// Extract a single embedding vector from the response, tolerating the
/// `{"embedding": [...]}`, `{"data": [{"embedding": [...]}]}` and bare-array
/// shapes used by the supported providers.
fn parse_embedding(value: Value) -> Result<Vec<f32>, EmbedError> {
    match value {
        Value::Object(mut map) => {
            if let Some(embedding) = map.remove("embedding") {
                return parse_vector(embedding);
            }

            if let Some(Value::Array(items)) = map.remove("data") {
                let first = items.into_iter().next().ok_or_else(|| {
                    EmbedError::MalformedResponse("empty `data` array".into())
                })?;
                return match first {
                    Value::Object(mut obj) => match obj.remove("embedding") {
                        Some(embedding) => parse_vector(embedding),
                        None => Err(EmbedError::MalformedResponse(
                            "missing `embedding` field in data item".into(),
                        )),
                    },
                    _ => Err(EmbedError::MalformedResponse(
                        "unexpected entry inside `data` array".into(),
                    )),
                };
            }

            Err(EmbedError::MalformedResponse(
                "unsupported embedding response shape".into(),
            ))
        }
        other => parse_vector(other),
    }
}

fn parse_vector(value: Value) -> Result<Vec<f32>, EmbedError> {
    match value {
        Value::Array(values) => values
            .into_iter()
            .map(|entry| match entry {
                Value::Number(num) => num.as_f64().map(|f| f as f32).ok_or_else(|| {
                    EmbedError::MalformedResponse("non-finite embedding value".into())
                }),
                other => Err(EmbedError::MalformedResponse(format!(
                    "embedding entries must be numbers, got {other:?}"
                ))),
            })
            .collect(),
        other => Err(EmbedError::MalformedResponse(format!(
            "embedding vector must be an array, got {other:?}"
        ))),
    }
}
