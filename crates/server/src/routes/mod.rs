pub mod health;
pub mod search;

use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

/// API information endpoint
pub async fn api_info() -> Json<Value> {
    Json(json!({
        "name": "prodsearch",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Semantic product search with keyword fallback",
        "endpoints": {
            "search": "POST /search",
            "health": "GET /health",
            "ready": "GET /ready",
        }
    }))
}

/// Fallback handler for unknown routes
pub async fn not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": {
                "code": "NOT_FOUND",
                "message": "The requested resource was not found",
            }
        })),
    )
}
