//! Typed evaluation of a normalized read filter.
//!
//! Query-string operands arrive as strings. Each field declares a kind, and
//! operands are coerced to that kind before comparing, so `price[gte]=500`
//! compares numbers rather than text. A condition that cannot be understood
//! (unknown field or operator, operand of the wrong shape) matches nothing.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use natours_core::query::{Filter, SortSpec};
use natours_core::tours::parse_start_date;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldKind {
    Text,
    Number,
    Bool,
    Time,
    Uuid,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FieldValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Time(DateTime<Utc>),
    Uuid(Uuid),
}

impl FieldKind {
    /// Read a JSON operand as a value of this kind.
    pub(crate) fn coerce(self, value: &Value) -> Option<FieldValue> {
        match (self, value) {
            (FieldKind::Text, Value::String(s)) => Some(FieldValue::Text(s.clone())),
            (FieldKind::Text, Value::Number(n)) => Some(FieldValue::Text(n.to_string())),
            (FieldKind::Text, Value::Bool(b)) => Some(FieldValue::Text(b.to_string())),
            (FieldKind::Number, Value::Number(n)) => n.as_f64().map(FieldValue::Number),
            (FieldKind::Number, Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(FieldValue::Number),
            (FieldKind::Bool, Value::Bool(b)) => Some(FieldValue::Bool(*b)),
            (FieldKind::Bool, Value::String(s)) => match s.trim() {
                "true" => Some(FieldValue::Bool(true)),
                "false" => Some(FieldValue::Bool(false)),
                _ => None,
            },
            (FieldKind::Time, Value::String(s)) => parse_start_date(s).map(FieldValue::Time),
            (FieldKind::Uuid, Value::String(s)) => {
                Uuid::parse_str(s.trim()).ok().map(FieldValue::Uuid)
            }
            _ => None,
        }
    }
}

impl FieldValue {
    /// Ordering within one kind; values of different kinds do not compare.
    pub(crate) fn compare(&self, other: &FieldValue) -> Option<Ordering> {
        match (self, other) {
            (FieldValue::Text(a), FieldValue::Text(b)) => Some(a.cmp(b)),
            (FieldValue::Number(a), FieldValue::Number(b)) => a.partial_cmp(b),
            (FieldValue::Bool(a), FieldValue::Bool(b)) => Some(a.cmp(b)),
            (FieldValue::Time(a), FieldValue::Time(b)) => Some(a.cmp(b)),
            (FieldValue::Uuid(a), FieldValue::Uuid(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

/// A record whose fields a read filter can address by their public name.
pub(crate) trait Filterable {
    fn field_kind(name: &str) -> Option<FieldKind>;

    /// `None` for an unknown field or an unset optional one.
    fn field_value(&self, name: &str) -> Option<FieldValue>;
}

/// One resolved comparison on one field.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Predicate {
    Eq(FieldValue),
    Ne(FieldValue),
    Gt(FieldValue),
    Gte(FieldValue),
    Lt(FieldValue),
    Lte(FieldValue),
    In(Vec<FieldValue>),
    NotIn(Vec<FieldValue>),
    Never,
}

impl Predicate {
    fn resolve(kind: FieldKind, op: &str, operand: &Value) -> Self {
        let list = || -> Vec<FieldValue> {
            match operand {
                Value::Array(items) => items.iter().filter_map(|v| kind.coerce(v)).collect(),
                other => kind.coerce(other).into_iter().collect(),
            }
        };
        let scalar = |make: fn(FieldValue) -> Predicate| {
            kind.coerce(operand).map(make).unwrap_or(Predicate::Never)
        };

        match op {
            "$eq" => scalar(Predicate::Eq),
            "$neq" => scalar(Predicate::Ne),
            "$gt" => scalar(Predicate::Gt),
            "$gte" => scalar(Predicate::Gte),
            "$lt" => scalar(Predicate::Lt),
            "$lte" => scalar(Predicate::Lte),
            "$in" => Predicate::In(list()),
            "$nin" => Predicate::NotIn(list()),
            _ => Predicate::Never,
        }
    }

    /// A missing value fails every comparison.
    pub(crate) fn matches(&self, actual: Option<&FieldValue>) -> bool {
        let Some(actual) = actual else {
            return false;
        };
        let ord = |expected: &FieldValue| actual.compare(expected);
        match self {
            Predicate::Eq(v) => actual == v,
            Predicate::Ne(v) => actual != v,
            Predicate::Gt(v) => ord(v) == Some(Ordering::Greater),
            Predicate::Gte(v) => matches!(ord(v), Some(Ordering::Greater | Ordering::Equal)),
            Predicate::Lt(v) => ord(v) == Some(Ordering::Less),
            Predicate::Lte(v) => matches!(ord(v), Some(Ordering::Less | Ordering::Equal)),
            Predicate::In(values) => values.contains(actual),
            Predicate::NotIn(values) => !values.contains(actual),
            Predicate::Never => false,
        }
    }
}

/// Flatten a filter into `(field, predicate)` pairs, all of which must hold.
pub(crate) fn predicates<T: Filterable>(filter: &Filter) -> Vec<(String, Predicate)> {
    let mut resolved = Vec::new();

    for (field, condition) in filter.iter() {
        let Some(kind) = T::field_kind(field) else {
            resolved.push((field.clone(), Predicate::Never));
            continue;
        };

        match condition {
            Value::Object(ops) if ops.is_empty() => {
                resolved.push((field.clone(), Predicate::Never));
            }
            Value::Object(ops) => {
                for (op, operand) in ops {
                    resolved.push((field.clone(), Predicate::resolve(kind, op, operand)));
                }
            }
            Value::Array(_) => {
                resolved.push((field.clone(), Predicate::resolve(kind, "$in", condition)));
            }
            other => resolved.push((field.clone(), Predicate::resolve(kind, "$eq", other))),
        }
    }

    resolved
}

pub(crate) fn matches_filter<T: Filterable>(record: &T, filter: &Filter) -> bool {
    predicates::<T>(filter)
        .iter()
        .all(|(field, predicate)| predicate.matches(record.field_value(field).as_ref()))
}

/// Order two records by the sort keys in turn. Unset values sort first.
pub(crate) fn compare_records<T: Filterable>(a: &T, b: &T, sort: &SortSpec) -> Ordering {
    for order in sort.fields() {
        let ord = match (a.field_value(&order.field), b.field_value(&order.field)) {
            (Some(x), Some(y)) => x.compare(&y).unwrap_or(Ordering::Equal),
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        let ord = if order.negated { ord.reverse() } else { ord };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;
    use natours_core::query::{QueryParams, ReadQuery};

    struct Row {
        name: &'static str,
        price: f64,
        discount: Option<f64>,
    }

    impl Filterable for Row {
        fn field_kind(name: &str) -> Option<FieldKind> {
            match name {
                "name" => Some(FieldKind::Text),
                "price" | "priceDiscount" => Some(FieldKind::Number),
                _ => None,
            }
        }

        fn field_value(&self, name: &str) -> Option<FieldValue> {
            match name {
                "name" => Some(FieldValue::Text(self.name.into())),
                "price" => Some(FieldValue::Number(self.price)),
                "priceDiscount" => self.discount.map(FieldValue::Number),
                _ => None,
            }
        }
    }

    fn filter(raw: &str) -> Filter {
        ReadQuery::from_params(&QueryParams::parse(raw), &["name", "price", "priceDiscount", "role"])
            .filter
    }

    const CHEAP: Row = Row { name: "Forest", price: 97.0, discount: None };
    const PRICEY: Row = Row { name: "Sea", price: 1197.0, discount: Some(100.0) };

    #[test]
    fn test_numbers_compare_as_numbers() {
        // as text "97" > "500" and "1197" < "500"
        let f = filter("price[gte]=500");

        assert!(!matches_filter(&CHEAP, &f));
        assert!(matches_filter(&PRICEY, &f));
    }

    #[test]
    fn test_unknown_operator_and_nested_operand_match_nothing() {
        assert!(!matches_filter(&CHEAP, &filter("name[regex]=For")));
        assert!(!matches_filter(&CHEAP, &filter("name[gte][x]=1")));
        assert!(!matches_filter(&CHEAP, &filter("price[lt]=cheap")));
    }

    #[test]
    fn test_field_without_kind_matches_nothing() {
        assert!(!matches_filter(&CHEAP, &filter("role=admin")));
    }

    #[test]
    fn test_missing_value_fails_every_comparison() {
        assert!(!matches_filter(&CHEAP, &filter("priceDiscount[neq]=5")));
        assert!(matches_filter(&PRICEY, &filter("priceDiscount[neq]=5")));
    }

    #[test]
    fn test_in_lists_skip_uncoercible_items() {
        let f = filter("price[in]=97&price[in]=abc");

        assert!(matches_filter(&CHEAP, &f));
        assert!(!matches_filter(&PRICEY, &f));
    }

    #[test]
    fn test_compare_records_numeric_and_unset_first() {
        let by_price = SortSpec::parse("-price");
        assert_eq!(compare_records(&CHEAP, &PRICEY, &by_price), Ordering::Greater);

        let by_discount = SortSpec::parse("priceDiscount");
        assert_eq!(compare_records(&CHEAP, &PRICEY, &by_discount), Ordering::Less);
    }

    #[test]
    fn test_coerce_times_and_uuids() {
        assert!(matches!(
            FieldKind::Time.coerce(&Value::String("2021-04-25".into())),
            Some(FieldValue::Time(_))
        ));
        assert_eq!(FieldKind::Uuid.coerce(&Value::String("nope".into())), None);
        assert_eq!(
            FieldKind::Bool.coerce(&Value::String("true".into())),
            Some(FieldValue::Bool(true))
        );
    }
}
