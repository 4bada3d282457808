use crate::state::ServerState;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

/// Liveness probe
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Readiness probe, reports whether a search backend is configured.
///
/// Searches against an unconfigured backend fail with a 500, so operators
/// can watch this flag without probing the search endpoint itself.
pub async fn readiness_check(State(state): State<ServerState>) -> Json<Value> {
    Json(json!({
        "status": "ready",
        "backend_configured": state.service.backend_configured(),
    }))
}
