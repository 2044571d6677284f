//! Listing users through the query translation layer.

use serde_json::{Map, Value};

use crate::error::DomainError;
use crate::ports::UserRepository;
use crate::query::{QueryParams, ReadQuery};

/// Fields a list request may filter on. Credential fields are deliberately
/// absent.
pub const USER_FILTER_FIELDS: [&str; 4] = ["name", "email", "photo", "role"];

/// Run a list query and return projected profiles.
///
/// A page that starts past the last record is rejected; the first page of an
/// empty collection is just empty.
pub async fn list_users(
    users: &dyn UserRepository,
    params: &QueryParams,
) -> Result<Vec<Map<String, Value>>, DomainError> {
    let query = ReadQuery::from_params(params, &USER_FILTER_FIELDS);
    query.ensure_page_exists(users.count().await?)?;

    let found = users.find_many(&query).await?;
    query
        .projection
        .project_all(found.iter().map(|user| user.profile()))
}
