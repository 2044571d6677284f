//! Projection, sort and page-window calculators.
//!
//! Independent pure functions over the generic parameter map.

use serde_json::Value;

use super::QueryParams;

/// Internal document-version field, hidden unless asked for.
pub const VERSION_FIELD: &str = "__v";
pub const DEFAULT_PROJECTION: &str = "-__v";
/// Newest first.
pub const DEFAULT_SORT: &str = "-createdAt";
/// Largest integer a JSON number carries exactly; stands in for "no limit".
pub const MAX_SAFE_INTEGER: u64 = 9_007_199_254_740_991;

/// Resolved skip/limit pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub skip: u64,
    pub limit: u64,
}

impl PageWindow {
    pub fn from_query(query: &QueryParams) -> Self {
        Self {
            skip: get_skip_count(query),
            limit: get_limit_count(query),
        }
    }
}

/// `fields=name,price` -> `"name price"`; defaults to hiding the version field.
pub fn get_projection(query: &QueryParams) -> String {
    comma_list(query, "fields", DEFAULT_PROJECTION)
}

/// `sort=-price,name` -> `"-price name"`; defaults to newest first.
pub fn get_sort_fields(query: &QueryParams) -> String {
    comma_list(query, "sort", DEFAULT_SORT)
}

pub fn get_limit_count(query: &QueryParams) -> u64 {
    get_limit_count_or(query, MAX_SAFE_INTEGER)
}

/// `limit` coerced to a positive integer, or `default` when absent or invalid.
pub fn get_limit_count_or(query: &QueryParams, default: u64) -> u64 {
    match coerce_integer(query.get("limit")) {
        Some(limit) if limit >= 1 => limit as u64,
        _ => default,
    }
}

pub fn get_page_count(query: &QueryParams) -> u64 {
    get_page_count_or(query, 1)
}

/// `page` coerced to an integer and clamped to at least 1.
pub fn get_page_count_or(query: &QueryParams, default: u64) -> u64 {
    let page = coerce_integer(query.get("page")).unwrap_or(default as i64);
    page.max(1) as u64
}

/// `(page - 1) * limit`, saturating. Whether the page exists is the caller's call.
pub fn get_skip_count(query: &QueryParams) -> u64 {
    let limit = get_limit_count(query);
    let page = get_page_count(query);
    let skip = (page - 1).saturating_mul(limit);
    tracing::debug!(page, limit, skip, "Resolved page window");
    skip
}

fn comma_list(query: &QueryParams, key: &str, default: &str) -> String {
    let joined = query
        .get_str(key)
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|field| !field.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default();

    if joined.is_empty() {
        default.to_string()
    } else {
        joined
    }
}

/// Numeric coercion: integers, or finite decimals truncated toward zero.
fn coerce_integer(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64))
        }
        Value::Array(items) => coerce_integer(items.last()),
        _ => None,
    }
}
