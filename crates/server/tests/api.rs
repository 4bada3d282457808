//! HTTP API tests driving the router directly with mock search clients.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use prodsearch::query::QuerySpec;
use prodsearch::{
    BackendError, EmbedError, Embedder, SearchBackend, SearchConfig, SearchService,
};
use serde_json::{json, Value};
use server::{build_router, ServerConfig, ServerState};
use std::sync::Arc;
use tower::ServiceExt;

struct FixedEmbedder;

#[async_trait]
impl Embedder for FixedEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbedError> {
        Ok(vec![0.5, 0.5])
    }
}

struct CannedBackend {
    response: Value,
}

#[async_trait]
impl SearchBackend for CannedBackend {
    async fn execute(&self, query: &QuerySpec) -> Result<Value, BackendError> {
        if query.body.get("track_total_hits").is_some() {
            return Ok(json!({ "hits": { "total": { "value": 42 } } }));
        }
        Ok(self.response.clone())
    }
}

struct DownBackend;

#[async_trait]
impl SearchBackend for DownBackend {
    async fn execute(&self, _query: &QuerySpec) -> Result<Value, BackendError> {
        Err(BackendError::Request("connection refused".into()))
    }
}

fn router_with_backend(backend: Option<Arc<dyn SearchBackend>>) -> Router {
    let service = SearchService::new(SearchConfig::default(), Arc::new(FixedEmbedder), backend);
    build_router(ServerState::with_service(ServerConfig::default(), service))
}

fn healthy_router() -> Router {
    router_with_backend(Some(Arc::new(CannedBackend {
        response: json!({
            "hits": {
                "hits": [
                    {
                        "_score": 1.5,
                        "_source": {
                            "id": "sku-1",
                            "title": "Trail Shoe",
                            "metadata": { "final_price": 89.99, "brand": "Acme" }
                        }
                    }
                ]
            }
        }),
    })))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_search(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/search")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn api_info_lists_endpoints() {
    let response = healthy_router()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["name"], "prodsearch");
    assert!(body["endpoints"]["search"].is_string());
}

#[tokio::test]
async fn health_endpoint_is_live() {
    let response = healthy_router()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn readiness_reports_backend_configuration() {
    let response = router_with_backend(None)
        .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["backend_configured"], false);
}

#[tokio::test]
async fn search_returns_normalized_products() {
    let response = healthy_router()
        .oneshot(post_search(json!({ "query": "trail shoes", "limit": 5 })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    assert_eq!(body["products"][0]["id"], "sku-1");
    assert_eq!(body["products"][0]["name"], "Trail Shoe");
    assert_eq!(body["products"][0]["price"], 89.99);
    assert_eq!(body["total"], 42);
    assert_eq!(body["limit"], 5);
    assert_eq!(body["offset"], 0);
    assert!(body["processingTimeMs"].is_u64());
}

#[tokio::test]
async fn search_echoes_request_id_header() {
    let response = healthy_router()
        .oneshot(post_search(json!({ "query": "laptop" })))
        .await
        .unwrap();

    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn invalid_limit_is_a_bad_request() {
    let response = healthy_router()
        .oneshot(post_search(json!({ "query": "laptop", "limit": 0 })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["message"].is_string());
}

#[tokio::test]
async fn missing_query_field_is_rejected() {
    let response = healthy_router()
        .oneshot(post_search(json!({ "limit": 5 })))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn backend_outage_surfaces_as_search_error() {
    let response = router_with_backend(Some(Arc::new(DownBackend)))
        .oneshot(post_search(json!({ "query": "laptop" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "SEARCH_ERROR");
}

#[tokio::test]
async fn unknown_routes_return_404() {
    let response = healthy_router()
        .oneshot(Request::get("/api/v1/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}
