//! Read filters as SQL conditions.

use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, Condition};

use natours_core::query::Filter;

use super::filtering::{predicates, FieldValue, Filterable, Predicate};

impl From<FieldValue> for sea_orm::Value {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Text(s) => s.into(),
            FieldValue::Number(n) => n.into(),
            FieldValue::Bool(b) => b.into(),
            FieldValue::Time(t) => t.into(),
            FieldValue::Uuid(u) => u.into(),
        }
    }
}

/// Translate a filter over `T`'s public field names into a condition on `C`.
/// Anything that cannot be translated becomes `FALSE`, never a dropped clause.
pub(crate) fn condition_for<T, C>(
    filter: &Filter,
    column_for: impl Fn(&str) -> Option<C>,
) -> Condition
where
    T: Filterable,
    C: ColumnTrait,
{
    predicates::<T>(filter)
        .into_iter()
        .fold(Condition::all(), |condition, (field, predicate)| {
            let Some(column) = column_for(&field) else {
                return condition.add(Expr::cust("FALSE"));
            };
            let expr = match predicate {
                Predicate::Eq(v) => column.eq(v),
                Predicate::Ne(v) => column.ne(v),
                Predicate::Gt(v) => column.gt(v),
                Predicate::Gte(v) => column.gte(v),
                Predicate::Lt(v) => column.lt(v),
                Predicate::Lte(v) => column.lte(v),
                Predicate::In(values) => column.is_in(values),
                Predicate::NotIn(values) => column.is_not_in(values),
                Predicate::Never => Expr::cust("FALSE"),
            };
            condition.add(expr)
        })
}
