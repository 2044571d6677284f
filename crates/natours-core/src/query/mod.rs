//! Query-string translation.
//!
//! Turns the decoded query parameters of a read request into the primitives a
//! document store consumes: an allow-listed filter with normalized comparison
//! operators, a projection, a sort order and a skip/limit page window.

mod filter;
mod operators;
mod pagination;
mod params;
mod read;

pub use filter::{build_filters, Filter};
pub use operators::{normalize_operators, normalize_key, OPERATORS, OPERATOR_SIGIL};
pub use pagination::{
    get_limit_count, get_limit_count_or, get_page_count, get_page_count_or, get_projection,
    get_skip_count, get_sort_fields, PageWindow, DEFAULT_PROJECTION, DEFAULT_SORT,
    MAX_SAFE_INTEGER, VERSION_FIELD,
};
pub use params::QueryParams;
pub use read::{FieldOrder, ProjectionSpec, ReadQuery, SortSpec};
