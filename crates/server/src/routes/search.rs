use crate::error::ServerResult;
use crate::state::ServerState;
use axum::extract::State;
use axum::Json;
use prodsearch::{SearchRequest, SearchResponse};

/// Search endpoint
///
/// POST /search with a JSON body:
/// ```json
/// {
///   "query": "wireless headphones by Sony",
///   "limit": 10,
///   "offset": 0,
///   "filters": { "category": "electronics", "priceMin": 20.0 }
/// }
/// ```
pub async fn search(
    State(state): State<ServerState>,
    Json(request): Json<SearchRequest>,
) -> ServerResult<Json<SearchResponse>> {
    tracing::debug!(query = %request.query, limit = request.limit, "search request received");

    let response = state.service.search(&request).await?;

    tracing::info!(
        query = %request.query,
        results = response.products.len(),
        total = response.total,
        processing_time_ms = response.processing_time_ms,
        "search request served"
    );

    Ok(Json(response))
}
