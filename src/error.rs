use thiserror::Error;

/// Errors raised by the embedding provider.
///
/// The orchestrator absorbs these: a failed embedding call downgrades the
/// request to the keyword path instead of surfacing to the caller.
#[derive(Debug, Error)]
pub enum EmbedError {
    /// The embedder is missing a required setting (e.g. no API URL).
    #[error("invalid embedder config: {0}")]
    InvalidConfig(String),
    /// The HTTP call to the embedding model failed outright.
    #[error("embedding request failed: {0}")]
    Request(String),
    /// The model answered with a shape we cannot extract a vector from.
    #[error("malformed embedding response: {0}")]
    MalformedResponse(String),
}

/// Errors raised by the search index backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// No backend endpoint was ever configured for this process.
    #[error("search backend is not configured")]
    NotConfigured,
    /// Transport-level failure reaching the backend.
    #[error("backend request failed: {0}")]
    Request(String),
    /// The backend answered with a non-success HTTP status.
    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    /// The backend body was not parseable JSON.
    #[error("malformed backend response: {0}")]
    MalformedResponse(String),
}

/// Errors surfaced by [`SearchService::search`](crate::SearchService::search).
///
/// Only two of the underlying failure modes ever reach the caller: a request
/// that fails validation before any backend call, and a keyword-path backend
/// failure after the vector path has already been exhausted.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid search request: {0}")]
    Validation(String),

    #[error("embedding unavailable: {0}")]
    Embedding(#[from] EmbedError),

    #[error("search failed: {0}")]
    Backend(#[from] BackendError),
}

/// Coarse classification consumed by the HTTP adapter for status mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Internal,
}

impl SearchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SearchError::Validation(_) => ErrorKind::Validation,
            SearchError::Embedding(_) | SearchError::Backend(_) => ErrorKind::Internal,
        }
    }
}
