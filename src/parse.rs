//! Filter-phrase extraction from free-text queries.
//!
//! Shoppers write constraints into the query itself ("running shoes by Acme
//! under electronics"). Pulling those phrases into structured filters before
//! embedding improves both paths: the vector query embeds cleaner text and
//! the filters apply conjunctively. Explicit filters always win; extraction
//! only fills fields the caller left unset.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::SearchFilters;

static BRAND_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:brand|from|by)\s+([A-Za-z0-9]+(?:\s+[A-Za-z0-9]+)*?)(?:\s+(?:and|or|with|for|in|under)\b|$)",
    )
    .expect("brand pattern must compile")
});

static CATEGORY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:(?:in\s+)?category|under)\s+([A-Za-z0-9]+(?:\s+[A-Za-z0-9]+)*?)(?:\s+(?:and|or|with|for|brand)\b|$)",
    )
    .expect("category pattern must compile")
});

/// Extract brand/category phrases out of `query` into any unset filter
/// fields, returning the cleaned query text and the merged filters. A query
/// left empty by extraction falls back to the original text.
pub fn parse_query(query: &str, filters: &SearchFilters) -> (String, SearchFilters) {
    let mut filters = filters.clone();
    if query.trim().is_empty() {
        return (query.to_string(), filters);
    }

    let mut cleaned = query.to_string();

    if is_unset(filters.brand.as_deref()) {
        if let Some(value) = extract(&BRAND_RE, &mut cleaned) {
            filters.brand = Some(value);
        }
    }

    if is_unset(filters.category.as_deref()) {
        if let Some(value) = extract(&CATEGORY_RE, &mut cleaned) {
            filters.category = Some(value);
        }
    }

    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        (query.to_string(), filters)
    } else {
        (collapsed, filters)
    }
}

fn is_unset(value: Option<&str>) -> bool {
    value.map_or(true, str::is_empty)
}

/// Capture the phrase value and strip the keyword-plus-value span from the
/// text, keeping any trailing connector word for readability of what's left.
fn extract(pattern: &Regex, text: &mut String) -> Option<String> {
    let caps = pattern.captures(text)?;
    let full = caps.get(0)?;
    let value = caps.get(1)?;

    let extracted = value.as_str().trim().to_string();
    text.replace_range(full.start()..value.end(), "");
    Some(extracted)
}
