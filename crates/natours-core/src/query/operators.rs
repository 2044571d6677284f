//! Comparison-operator normalization.
//!
//! Rewrites mapping keys such as `gte` or `IN` into the store's operator
//! syntax (`$gte`, `$in`). Only keys are rewritten; string values that happen
//! to spell an operator are left alone.

use std::borrow::Cow;

use serde_json::{Map, Value};

/// Comparison keywords recognized as operators.
pub const OPERATORS: [&str; 8] = ["gte", "gt", "lte", "lt", "eq", "neq", "in", "nin"];

/// Prefix marking an operator key.
pub const OPERATOR_SIGIL: char = '$';

/// Operator form of `key` if it is a bare comparison keyword (any case).
/// Already-prefixed keys are returned unchanged, which keeps normalization
/// idempotent.
pub fn normalize_key(key: &str) -> Cow<'_, str> {
    match OPERATORS.iter().find(|op| op.eq_ignore_ascii_case(key)) {
        Some(op) => Cow::Owned(format!("{OPERATOR_SIGIL}{op}")),
        None => Cow::Borrowed(key),
    }
}

/// Rewrite operator keys at every depth, including inside arrays.
pub fn normalize_operators(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(normalize_map(map)),
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_operators).collect()),
        other => other,
    }
}

pub(crate) fn normalize_map(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .map(|(key, value)| (normalize_key(&key).into_owned(), normalize_operators(value)))
        .collect()
}
