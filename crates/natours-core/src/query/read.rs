use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::DomainError;

use super::{build_filters, get_projection, get_sort_fields, Filter, PageWindow, QueryParams};

/// One entry of a space-separated field list. A leading `-` flips it:
/// descending for sorts, excluded for projections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOrder {
    pub field: String,
    pub negated: bool,
}

fn parse_fields(raw: &str) -> Vec<FieldOrder> {
    raw.split_whitespace()
        .filter_map(|token| {
            let (field, negated) = match token.strip_prefix('-') {
                Some(rest) => (rest, true),
                None => (token.strip_prefix('+').unwrap_or(token), false),
            };
            (!field.is_empty()).then(|| FieldOrder {
                field: field.to_string(),
                negated,
            })
        })
        .collect()
}

/// Ordered sort keys; `negated` means descending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortSpec(Vec<FieldOrder>);

impl SortSpec {
    pub fn parse(raw: &str) -> Self {
        Self(parse_fields(raw))
    }

    pub fn fields(&self) -> &[FieldOrder] {
        &self.0
    }
}

/// Field selection; `negated` means excluded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectionSpec(Vec<FieldOrder>);

impl ProjectionSpec {
    pub fn parse(raw: &str) -> Self {
        Self(parse_fields(raw))
    }

    pub fn fields(&self) -> &[FieldOrder] {
        &self.0
    }

    /// Project a document in place. With any included field only those (and
    /// `id`) survive; excluded fields are always removed.
    pub fn apply(&self, document: &mut Map<String, Value>) {
        let included: Vec<&str> = self
            .0
            .iter()
            .filter(|f| !f.negated)
            .map(|f| f.field.as_str())
            .collect();

        if !included.is_empty() {
            document.retain(|key, _| key == "id" || included.contains(&key.as_str()));
        }

        for excluded in self.0.iter().filter(|f| f.negated) {
            document.remove(&excluded.field);
        }
    }

    /// Serialize each item to a JSON object and project it.
    pub fn project_all<T: Serialize>(
        &self,
        items: impl IntoIterator<Item = T>,
    ) -> Result<Vec<Map<String, Value>>, DomainError> {
        items
            .into_iter()
            .map(|item| match serde_json::to_value(item) {
                Ok(Value::Object(mut document)) => {
                    self.apply(&mut document);
                    Ok(document)
                }
                Ok(_) => Err(DomainError::Internal("document is not an object".to_string())),
                Err(e) => Err(DomainError::Internal(e.to_string())),
            })
            .collect()
    }
}

/// Everything a store needs to run a list query.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadQuery {
    pub filter: Filter,
    pub projection: ProjectionSpec,
    pub sort: SortSpec,
    pub skip: u64,
    pub limit: u64,
}

impl ReadQuery {
    pub fn from_params(params: &QueryParams, allowed_fields: &[&str]) -> Self {
        let PageWindow { skip, limit } = PageWindow::from_query(params);

        Self {
            filter: build_filters(params, allowed_fields),
            projection: ProjectionSpec::parse(&get_projection(params)),
            sort: SortSpec::parse(&get_sort_fields(params)),
            skip,
            limit,
        }
    }

    /// Every record, in default order.
    pub fn all() -> Self {
        Self::from_params(&QueryParams::new(), &[])
    }

    /// A page that starts past the last of `total` records does not exist.
    /// The first page of an empty collection does.
    pub fn ensure_page_exists(&self, total: u64) -> Result<(), DomainError> {
        if self.skip > 0 && self.skip >= total {
            return Err(DomainError::not_found("This page does not exist!"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_read_query_from_params() {
        let params = QueryParams::parse("role=guide&password=x&sort=-name,email&page=2&limit=5");

        let query = ReadQuery::from_params(&params, &["name", "email", "role"]);

        assert_eq!(serde_json::to_value(&query.filter).unwrap(), json!({"role": "guide"}));
        assert_eq!(query.skip, 5);
        assert_eq!(query.limit, 5);
        assert_eq!(
            query.sort.fields(),
            &[
                FieldOrder { field: "name".into(), negated: true },
                FieldOrder { field: "email".into(), negated: false },
            ]
        );
    }

    #[test]
    fn test_default_projection_hides_version() {
        let mut document = json!({"id": 1, "name": "Ada", "__v": 0}).as_object().cloned().unwrap();

        ReadQuery::from_params(&QueryParams::new(), &[]).projection.apply(&mut document);

        assert_eq!(Value::Object(document), json!({"id": 1, "name": "Ada"}));
    }

    #[test]
    fn test_ensure_page_exists() {
        let first = ReadQuery::all();
        assert!(first.ensure_page_exists(0).is_ok());

        let third = ReadQuery::from_params(&QueryParams::parse("page=3&limit=2"), &[]);
        assert!(third.ensure_page_exists(5).is_ok());
        assert!(matches!(third.ensure_page_exists(4), Err(DomainError::NotFound(_))));
    }

    #[test]
    fn test_project_all_serializes_and_projects() {
        #[derive(Serialize)]
        struct Row {
            id: u8,
            name: &'static str,
            secret: &'static str,
        }

        let rows = [Row { id: 1, name: "Ada", secret: "x" }];
        let projected = ProjectionSpec::parse("-secret").project_all(&rows).unwrap();

        assert_eq!(Value::Object(projected[0].clone()), json!({"id": 1, "name": "Ada"}));
    }

    #[test]
    fn test_inclusive_projection_keeps_id() {
        let mut document = json!({"id": 1, "name": "Ada", "email": "a@x.com", "role": "user"})
            .as_object()
            .cloned()
            .unwrap();

        ProjectionSpec::parse("name role").apply(&mut document);

        assert_eq!(Value::Object(document), json!({"id": 1, "name": "Ada", "role": "user"}));
    }
}
