use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Page size applied when the caller omits `limit`.
pub const DEFAULT_LIMIT: usize = 10;
/// Upper bound on a single result page.
pub const MAX_LIMIT: usize = 100;

/// A single search request. Constructed once per request and never mutated;
/// the orchestrator works on derived copies (e.g. after filter-phrase
/// extraction).
#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    /// Free-text query. Empty text is a valid "browse the catalog" request
    /// and degrades to a match-everything keyword query.
    pub query: String,

    /// Maximum number of products in the returned page (1..=100).
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Number of leading results to skip for pagination.
    #[serde(default)]
    pub offset: usize,

    /// Structured constraints applied conjunctively to both search paths.
    #[serde(default)]
    pub filters: SearchFilters,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            limit: DEFAULT_LIMIT,
            offset: 0,
            filters: SearchFilters::default(),
        }
    }

    /// Reject out-of-range paging before any backend call is made.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.limit < 1 || self.limit > MAX_LIMIT {
            return Err(SearchError::Validation(format!(
                "limit must be between 1 and {MAX_LIMIT}, got {}",
                self.limit
            )));
        }
        Ok(())
    }
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

/// Optional result constraints. An unset field means "no constraint on that
/// dimension"; all present fields must hold simultaneously.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchFilters {
    pub category: Option<String>,
    pub brand: Option<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
}

impl SearchFilters {
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.brand.is_none()
            && self.price_min.is_none()
            && self.price_max.is_none()
    }
}

/// Canonical product record, normalized from whatever field layout the
/// backend hit carried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub score: f64,
}

/// One completed search: the requested page plus pagination metadata.
///
/// `total` is recomputed off the keyword/filter query independently of the
/// returned window, so it may exceed `products.len()` and may disagree with
/// the vector path's own recall.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub products: Vec<Product>,
    pub total: u64,
    pub limit: usize,
    pub offset: usize,
    pub processing_time_ms: u64,
}
