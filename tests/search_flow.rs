//! End-to-end search pipeline tests over the public API with mock clients.

use async_trait::async_trait;
use prodsearch::query::QuerySpec;
use prodsearch::{
    BackendError, EmbedError, Embedder, SearchBackend, SearchConfig, SearchFilters, SearchRequest,
    SearchService,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

struct StubEmbedder {
    vector: Vec<f32>,
}

#[async_trait]
impl Embedder for StubEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbedError> {
        Ok(self.vector.clone())
    }
}

struct OfflineEmbedder;

#[async_trait]
impl Embedder for OfflineEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbedError> {
        Err(EmbedError::Request("provider timed out".into()))
    }
}

/// Records every query body it receives and answers from a fixed script.
struct ScriptedBackend {
    page_response: Value,
    total: u64,
    bodies: Mutex<Vec<Value>>,
}

impl ScriptedBackend {
    fn new(page_response: Value, total: u64) -> Arc<Self> {
        Arc::new(Self {
            page_response,
            total,
            bodies: Mutex::new(Vec::new()),
        })
    }

    fn recorded(&self) -> Vec<Value> {
        self.bodies.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchBackend for ScriptedBackend {
    async fn execute(&self, query: &QuerySpec) -> Result<Value, BackendError> {
        self.bodies.lock().unwrap().push(query.body.clone());
        if query.body.get("track_total_hits").is_some() {
            return Ok(json!({ "hits": { "total": { "value": self.total } } }));
        }
        Ok(self.page_response.clone())
    }
}

fn catalog_page() -> Value {
    json!({
        "hits": {
            "hits": [
                {
                    "_score": 3.2,
                    "_source": {
                        "asin": "B0100",
                        "title": "Noise Cancelling Headphones",
                        "image_url": "https://img.example/b0100.jpg",
                        "metadata": {
                            "final_price": 149.5,
                            "brand": "Sonic",
                            "categories": ["Electronics", "Audio"]
                        }
                    }
                },
                {
                    "_score": 2.1,
                    "_source": {
                        "id": "p-201",
                        "name": "Wired Earbuds",
                        "price": 19.99,
                        "category": "Audio",
                        "brand": "Budget Co"
                    }
                }
            ]
        }
    })
}

fn service(embedder: Arc<dyn Embedder>, backend: Arc<ScriptedBackend>) -> SearchService {
    SearchService::new(
        SearchConfig::default(),
        embedder,
        Some(backend as Arc<dyn SearchBackend>),
    )
}

#[tokio::test]
async fn vector_page_with_filters_and_normalized_hits() {
    let backend = ScriptedBackend::new(catalog_page(), 128);
    let svc = service(
        Arc::new(StubEmbedder {
            vector: vec![0.1; 8],
        }),
        backend.clone(),
    );

    let mut request = SearchRequest::new("headphones");
    request.limit = 20;
    request.offset = 40;
    request.filters = SearchFilters {
        category: Some("electronics".into()),
        price_min: Some(10.0),
        price_max: Some(200.0),
        ..SearchFilters::default()
    };

    let response = svc.search(&request).await.expect("search should succeed");

    // Hit normalization picks up both alias spellings.
    assert_eq!(response.products[0].id, "B0100");
    assert_eq!(response.products[0].name, "Noise Cancelling Headphones");
    assert_eq!(response.products[0].price, 149.5);
    assert_eq!(
        response.products[0].category.as_deref(),
        Some("Electronics, Audio")
    );
    assert_eq!(response.products[0].brand.as_deref(), Some("Sonic"));
    assert_eq!(response.products[1].id, "p-201");
    assert_eq!(response.products[1].price, 19.99);

    assert_eq!(response.total, 128);
    assert_eq!(response.limit, 20);
    assert_eq!(response.offset, 40);

    // The knn body reflects pagination arithmetic and filters.
    let knn = &backend.recorded()[0]["knn"];
    assert_eq!(knn["field"], "embeddings");
    assert_eq!(knn["k"], 60);
    assert_eq!(knn["num_candidates"], 120);
    let must = knn["filter"]["bool"]["must"].as_array().unwrap();
    assert_eq!(must.len(), 2);
    assert_eq!(
        must[0]["bool"]["should"][1]["wildcard"]["metadata.categories"]["value"],
        "*electronics*"
    );
    assert_eq!(must[1]["range"]["metadata.final_price"]["gte"], 10.0);
    assert_eq!(must[1]["range"]["metadata.final_price"]["lte"], 200.0);
}

#[tokio::test]
async fn embedding_outage_is_invisible_to_the_caller() {
    let backend = ScriptedBackend::new(catalog_page(), 2);
    let svc = service(Arc::new(OfflineEmbedder), backend.clone());

    let response = svc
        .search(&SearchRequest::new("headphones"))
        .await
        .expect("keyword fallback should serve the page");

    // Same response shape as the vector path.
    assert_eq!(response.products.len(), 2);
    assert_eq!(response.total, 2);

    // The page was served by a keyword query, never a knn one.
    let bodies = backend.recorded();
    assert!(bodies.iter().all(|b| b.get("knn").is_none()));
    let multi = &bodies[0]["query"]["bool"]["must"][0]["multi_match"];
    assert_eq!(multi["query"], "headphones");
    assert_eq!(multi["fields"][0], "title^2");
    assert_eq!(multi["type"], "best_fields");
}

#[tokio::test]
async fn empty_query_with_filters_browses_the_category() {
    let backend = ScriptedBackend::new(catalog_page(), 64);
    let svc = service(Arc::new(OfflineEmbedder), backend.clone());

    let mut request = SearchRequest::new("   ");
    request.filters.brand = Some("Sonic".into());

    let response = svc.search(&request).await.expect("browse should succeed");
    assert_eq!(response.total, 64);

    // Blank text contributes no match clause; the brand filter alone
    // constrains the page.
    let body = &backend.recorded()[0];
    let must = body["query"]["bool"]["must"].as_array().unwrap();
    assert_eq!(must.len(), 1);
    assert_eq!(
        must[0]["bool"]["should"][0]["match"]["metadata.brand"],
        "Sonic"
    );
}

#[tokio::test]
async fn natural_language_phrases_feed_the_filters() {
    let backend = ScriptedBackend::new(catalog_page(), 5);
    let svc = service(
        Arc::new(StubEmbedder {
            vector: vec![0.3; 4],
        }),
        backend.clone(),
    );

    svc.search(&SearchRequest::new("stand mixer by KitchenPro in category appliances"))
        .await
        .expect("search should succeed");

    let knn = &backend.recorded()[0]["knn"];
    let must = knn["filter"]["bool"]["must"].as_array().unwrap();
    assert_eq!(
        must[0]["bool"]["should"][0]["match"]["metadata.categories"],
        "appliances"
    );
    assert_eq!(
        must[1]["bool"]["should"][0]["match"]["metadata.brand"],
        "KitchenPro"
    );
}

#[tokio::test]
async fn explicit_filters_win_over_extracted_phrases() {
    let backend = ScriptedBackend::new(catalog_page(), 5);
    let svc = service(
        Arc::new(StubEmbedder {
            vector: vec![0.3; 4],
        }),
        backend.clone(),
    );

    let mut request = SearchRequest::new("shoes by Acme");
    request.filters.brand = Some("OtherBrand".into());

    svc.search(&request).await.expect("search should succeed");

    let knn = &backend.recorded()[0]["knn"];
    let must = knn["filter"]["bool"]["must"].as_array().unwrap();
    assert_eq!(
        must[0]["bool"]["should"][0]["match"]["metadata.brand"],
        "OtherBrand"
    );
}
