//! Normalizes raw backend hits into canonical [`Product`] records.
//!
//! Backends and index generations disagree on field names, so each canonical
//! field resolves through a declarative ordered alias list (first non-empty
//! value wins) instead of ad hoc conditionals. A missing or misshapen
//! response normalizes to an empty list, never an error.

use serde_json::Value;

use crate::types::Product;

const ID_ALIASES: &[&str] = &["id", "asin"];
const NAME_ALIASES: &[&str] = &["title", "name"];
const IMAGE_URL_ALIASES: &[&str] = &["image_url", "imageUrl"];

static NULL: Value = Value::Null;

/// Map a raw backend response into products, preserving backend order
/// (assumed already relevance-sorted). Pure function: identical input yields
/// identical output.
pub fn parse_search_hits(response: &Value) -> Vec<Product> {
    // Some client stacks wrap the payload in a `body` envelope.
    let hits = response
        .pointer("/hits/hits")
        .or_else(|| response.pointer("/body/hits/hits"));

    let Some(Value::Array(hits)) = hits else {
        tracing::debug!("no hits array in backend response");
        return Vec::new();
    };

    hits.iter().map(parse_hit).collect()
}

fn parse_hit(hit: &Value) -> Product {
    let source = hit.get("_source").unwrap_or(&NULL);
    let metadata = source.get("metadata").unwrap_or(&NULL);

    Product {
        id: first_string(source, ID_ALIASES).unwrap_or_default(),
        name: first_string(source, NAME_ALIASES).unwrap_or_default(),
        description: string_field(source, "description"),
        price: metadata
            .get("final_price")
            .and_then(Value::as_f64)
            .or_else(|| source.get("price").and_then(Value::as_f64))
            .unwrap_or(0.0),
        category: string_or_joined(metadata.get("categories"))
            .or_else(|| string_or_joined(source.get("category"))),
        brand: string_field(metadata, "brand").or_else(|| string_field(source, "brand")),
        image_url: first_string(source, IMAGE_URL_ALIASES),
        score: hit.get("_score").and_then(Value::as_f64).unwrap_or(0.0),
    }
}

fn first_string(source: &Value, aliases: &[&str]) -> Option<String> {
    aliases.iter().find_map(|field| {
        source
            .get(field)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
    })
}

fn string_field(source: &Value, field: &str) -> Option<String> {
    source
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Category values are sometimes a single string, sometimes a taxonomy path
/// as an array of strings.
fn string_or_joined(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        _ => None,
    }
}
