use serde::Serialize;
use serde_json::{Map, Value};

use super::operators::normalize_map;
use super::QueryParams;

/// Allow-listed, operator-normalized filter for a read query.
/// An empty filter matches every record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Filter(Map<String, Value>);

impl Filter {
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Keep only parameters whose key is in `allowed_fields` (exact,
/// case-sensitive), then normalize operators. Unknown keys, including the
/// paging and sorting controls, are dropped without error.
pub fn build_filters(params: &QueryParams, allowed_fields: &[&str]) -> Filter {
    let retained: Map<String, Value> = params
        .iter()
        .filter(|(key, _)| allowed_fields.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    Filter(normalize_map(retained))
}
