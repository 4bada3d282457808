//! Best-effort total-count resolution.
//!
//! The count always runs off the keyword/filter query with a zero-size
//! window, independent of which path actually served the page. That can
//! under- or over-count relative to vector recall; it is an accepted
//! approximation, not something to reconcile here. Counting must never abort
//! a request, so every failure resolves to a number.

use serde_json::{json, Value};

use crate::backend::SearchBackend;
use crate::query::build_text_query;
use crate::types::SearchFilters;

/// Total reported when no backend was ever configured. Distinguishes "no
/// backend" from a genuine zero-result count during ad-hoc testing.
pub const UNCONFIGURED_BACKEND_TOTAL: u64 = 2;

/// Resolve the total number of records matching `query` + `filters`,
/// ignoring pagination. Never fails: backend errors and malformed responses
/// resolve to `0`, an absent backend to [`UNCONFIGURED_BACKEND_TOTAL`].
pub async fn resolve_total(
    backend: Option<&dyn SearchBackend>,
    index: &str,
    query: &str,
    filters: &SearchFilters,
) -> u64 {
    let Some(backend) = backend else {
        return UNCONFIGURED_BACKEND_TOTAL;
    };

    let mut spec = build_text_query(index, query, 0, 0, filters);
    spec.body["track_total_hits"] = json!(true);

    match backend.execute(&spec).await {
        Ok(response) => extract_total(&response),
        Err(err) => {
            tracing::warn!(error = %err, "total count lookup failed");
            0
        }
    }
}

/// Pull the total out of the response, tolerating both the bare-integer and
/// the `{value, relation}` forms, with or without a `body` envelope.
fn extract_total(response: &Value) -> u64 {
    let total = response
        .pointer("/hits/total")
        .or_else(|| response.pointer("/body/hits/total"));

    match total {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        Some(Value::Object(obj)) => obj.get("value").and_then(Value::as_u64).unwrap_or(0),
        _ => 0,
    }
}
