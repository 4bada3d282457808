//! Compiles structured filters into backend predicate clauses.
//!
//! Each populated filter field becomes one conjunctive clause, emitted in
//! insertion order (category, brand, price range). Category and brand match
//! either exactly or as a case-insensitive substring: product taxonomies are
//! inconsistently cased and pluralized, and the substring arm recovers those
//! partial matches.

use serde_json::{json, Map, Value};

use crate::types::SearchFilters;

/// Compile filters into a list of conjunctive backend clauses. Pure; empty
/// filters yield an empty list.
pub fn compile_filters(filters: &SearchFilters) -> Vec<Value> {
    let mut clauses = Vec::new();

    if let Some(category) = filters.category.as_deref() {
        clauses.push(exact_or_substring("metadata.categories", category));
    }

    if let Some(brand) = filters.brand.as_deref() {
        clauses.push(exact_or_substring("metadata.brand", brand));
    }

    if filters.price_min.is_some() || filters.price_max.is_some() {
        let mut bounds = Map::new();
        if let Some(min) = filters.price_min {
            bounds.insert("gte".to_string(), json!(min));
        }
        if let Some(max) = filters.price_max {
            bounds.insert("lte".to_string(), json!(max));
        }
        clauses.push(json!({
            "range": { "metadata.final_price": Value::Object(bounds) }
        }));
    }

    clauses
}

fn exact_or_substring(field: &str, value: &str) -> Value {
    json!({
        "bool": {
            "should": [
                {
                    "match": { (field): value }
                },
                {
                    "wildcard": {
                        (field): {
                            "value": format!("*{}*", value.to_lowercase()),
                            "case_insensitive": true
                        }
                    }
                }
            ]
        }
    })
}
