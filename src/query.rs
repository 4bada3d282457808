//! Query construction for the two search paths.
//!
//! The vector builder embeds the query text and wraps the result in a
//! nearest-neighbor request; the keyword builder issues a relevance-weighted
//! multi-field match. Both apply the compiled filters conjunctively so the
//! backend filters during search rather than post-hoc.

use serde::Serialize;
use serde_json::{json, Value};

use crate::embed::Embedder;
use crate::error::EmbedError;
use crate::filters::compile_filters;
use crate::types::SearchFilters;

/// Document fields requested back from the backend for every hit.
pub const SOURCE_FIELDS: &[&str] = &["id", "title", "url", "image_url", "description", "metadata"];

/// Vector field indexed alongside each product document.
pub const EMBEDDING_FIELD: &str = "embeddings";

/// Floor on the nearest-neighbor candidate pool. Filtered recall is bounded
/// by this pool, so it stays well above typical page sizes.
pub const MIN_NUM_CANDIDATES: usize = 100;

/// A fully built backend query: target index plus request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuerySpec {
    pub index: String,
    pub body: Value,
}

/// Build a nearest-neighbor query for `query`.
///
/// Calls the embedder for the query vector; that failure propagates and is
/// what triggers the keyword fallback upstream. Requests `k = limit + offset`
/// neighbors over a candidate pool of `max(100, 2 * (limit + offset))`, with
/// the compiled filters applied on the vector search itself.
pub async fn build_vector_query(
    embedder: &dyn Embedder,
    index: &str,
    query: &str,
    limit: usize,
    offset: usize,
    filters: &SearchFilters,
) -> Result<QuerySpec, EmbedError> {
    let vector = embedder.embed(query).await?;

    // Saturate rather than wrap: a hostile offset must not panic the
    // builder, the backend rejects the oversized window on its own.
    let k = limit.saturating_add(offset);
    let num_candidates = MIN_NUM_CANDIDATES.max(k.saturating_mul(2));

    let mut knn = json!({
        "field": EMBEDDING_FIELD,
        "query_vector": vector,
        "k": k,
        "num_candidates": num_candidates,
    });

    let clauses = compile_filters(filters);
    if !clauses.is_empty() {
        knn["filter"] = json!({ "bool": { "must": clauses } });
    }

    Ok(QuerySpec {
        index: index.to_string(),
        body: json!({
            "size": limit,
            "from": offset,
            "knn": knn,
            "_source": { "includes": SOURCE_FIELDS },
        }),
    })
}

/// Build a keyword query for `query`.
///
/// Non-empty text becomes a multi-field match with the title weighted twice
/// the description. Filters are appended as mandatory clauses. With no text
/// and no filters the query deliberately degrades to match-everything: an
/// empty request is a browse of the unfiltered catalog, not an error.
pub fn build_text_query(
    index: &str,
    query: &str,
    limit: usize,
    offset: usize,
    filters: &SearchFilters,
) -> QuerySpec {
    let mut must = Vec::new();

    if !query.trim().is_empty() {
        must.push(json!({
            "multi_match": {
                "query": query,
                "fields": ["title^2", "description"],
                "type": "best_fields"
            }
        }));
    }

    must.extend(compile_filters(filters));

    let query_clause = if must.is_empty() {
        json!({ "match_all": {} })
    } else {
        json!({ "bool": { "must": must } })
    };

    QuerySpec {
        index: index.to_string(),
        body: json!({
            "size": limit,
            "from": offset,
            "query": query_clause,
            "_source": { "includes": SOURCE_FIELDS },
        }),
    }
}
