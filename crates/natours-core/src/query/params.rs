use serde_json::{Map, Value};
use url::form_urlencoded;

/// Decoded HTTP query parameters.
///
/// Values are strings, arrays of strings (repeated keys, `key[]=`) or nested
/// maps produced by bracket syntax: `price[gte]=100` becomes
/// `{"price": {"gte": "100"}}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams(Map<String, Value>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw (still percent-encoded) query string. A leading `?` is allowed.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        let mut params = Map::new();

        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            let path = split_key(&key);
            if path.is_empty() {
                continue;
            }
            insert_path(&mut params, &path, Value::String(value.into_owned()));
        }

        Self(params)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Scalar view of a parameter. For a repeated key the last value wins.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.0.get(key)? {
            Value::String(s) => Some(s),
            Value::Array(items) => items.iter().rev().find_map(Value::as_str),
            _ => None,
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for QueryParams {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// `a[b][c]` -> `["a", "b", "c"]`. Malformed brackets keep the key literal.
fn split_key(key: &str) -> Vec<&str> {
    if key.is_empty() {
        return Vec::new();
    }

    let (head, mut rest) = match key.find('[') {
        Some(idx) if idx > 0 => (&key[..idx], &key[idx..]),
        _ => return vec![key],
    };

    let mut path = vec![head];
    while let Some(stripped) = rest.strip_prefix('[') {
        match stripped.find(']') {
            Some(end) => {
                path.push(&stripped[..end]);
                rest = &stripped[end + 1..];
            }
            None => return vec![key],
        }
    }

    if !rest.is_empty() {
        return vec![key];
    }
    path
}

fn insert_path(map: &mut Map<String, Value>, path: &[&str], value: Value) {
    let Some((first, rest)) = path.split_first() else {
        return;
    };

    match rest {
        [] => append_value(map, first, value),
        // `tags[]=a` always yields an array
        [""] if !map.contains_key(*first) => {
            map.insert(first.to_string(), Value::Array(vec![value]));
        }
        [""] => append_value(map, first, value),
        _ => {
            let entry = map
                .entry(first.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(child) = entry {
                insert_path(child, rest, value);
            }
        }
    }
}

fn append_value(map: &mut Map<String, Value>, key: &str, value: Value) {
    match map.get_mut(key) {
        None => {
            map.insert(key.to_string(), value);
        }
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let previous = existing.take();
            *existing = Value::Array(vec![previous, value]);
        }
    }
}
