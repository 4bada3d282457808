//! Semantic product search with transparent keyword fallback.
//!
//! A request flows through a two-state pipeline: the vector path embeds the
//! query text and runs a nearest-neighbor search; if anything in that path
//! fails (embedding model down, backend rejecting the knn request) the same
//! request is retried exactly once as a keyword query. Whichever path served
//! the page, hits are normalized into canonical [`Product`] records and the
//! total count is resolved best-effort off the keyword/filter query.
//!
//! The HTTP surface lives in the `prodsearch-server` crate; this crate is
//! the decision logic only.

pub mod backend;
pub mod config;
pub mod count;
pub mod embed;
pub mod error;
pub mod filters;
pub mod hits;
pub mod parse;
pub mod query;
pub mod types;

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;

pub use backend::{HttpBackend, SearchBackend};
pub use config::{EmbedConfig, SearchConfig};
pub use embed::{Embedder, HttpEmbedder};
pub use error::{BackendError, EmbedError, ErrorKind, SearchError};
pub use types::{Product, SearchFilters, SearchRequest, SearchResponse};

use count::resolve_total;
use hits::parse_search_hits;
use query::{build_text_query, build_vector_query};

/// Orchestrates one search request end to end.
///
/// Owns the long-lived client handles (embedding provider, search backend),
/// created once at process start and shared by reference across requests.
/// Requests carry no state between each other: no shared backoff, no circuit
/// breaking, one vector-to-keyword fallback per request at most.
pub struct SearchService {
    config: Arc<SearchConfig>,
    embedder: Arc<dyn Embedder>,
    backend: Option<Arc<dyn SearchBackend>>,
}

impl SearchService {
    pub fn new(
        config: SearchConfig,
        embedder: Arc<dyn Embedder>,
        backend: Option<Arc<dyn SearchBackend>>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            embedder,
            backend,
        }
    }

    /// Build a service with HTTP clients derived from configuration.
    pub fn from_config(config: SearchConfig) -> Result<Self, SearchError> {
        let embedder = HttpEmbedder::new(config.embedding.clone(), config.timeout_secs)?;
        let backend = HttpBackend::from_config(&config)?
            .map(|backend| Arc::new(backend) as Arc<dyn SearchBackend>);
        Ok(Self::new(config, Arc::new(embedder), backend))
    }

    /// Whether a search backend was configured for this process.
    pub fn backend_configured(&self) -> bool {
        self.backend.is_some()
    }

    /// Execute one search request.
    ///
    /// Either returns a complete [`SearchResponse`] (possibly with zero
    /// products and zero total) or a single error; never a partial result.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError> {
        let started = Instant::now();
        request.validate()?;

        let (query, filters) = parse::parse_query(&request.query, &request.filters);
        let (limit, offset) = (request.limit, request.offset);

        let response = match self.vector_attempt(&query, limit, offset, &filters).await {
            Ok(response) => {
                tracing::debug!(query = %query, "vector search succeeded");
                response
            }
            Err(err) => {
                tracing::warn!(
                    query = %query,
                    error = %err,
                    "vector search failed, falling back to keyword search"
                );
                self.text_attempt(&query, limit, offset, &filters).await?
            }
        };

        let products = parse_search_hits(&response);
        let total = resolve_total(
            self.backend.as_deref(),
            &self.config.index,
            &query,
            &filters,
        )
        .await;

        Ok(SearchResponse {
            products,
            total,
            limit,
            offset,
            processing_time_ms: started.elapsed().as_millis() as u64,
        })
    }

    async fn vector_attempt(
        &self,
        query: &str,
        limit: usize,
        offset: usize,
        filters: &SearchFilters,
    ) -> Result<Value, SearchError> {
        let backend = self.backend()?;
        let spec = build_vector_query(
            self.embedder.as_ref(),
            &self.config.index,
            query,
            limit,
            offset,
            filters,
        )
        .await?;
        Ok(backend.execute(&spec).await?)
    }

    async fn text_attempt(
        &self,
        query: &str,
        limit: usize,
        offset: usize,
        filters: &SearchFilters,
    ) -> Result<Value, SearchError> {
        let backend = self.backend()?;
        let spec = build_text_query(&self.config.index, query, limit, offset, filters);
        Ok(backend.execute(&spec).await?)
    }

    fn backend(&self) -> Result<&dyn SearchBackend, BackendError> {
        self.backend.as_deref().ok_or(BackendError::NotConfigured)
    }
}
