//! Catch-all for unmatched routes.

use actix_web::{HttpRequest, HttpResponse};
use natours_core::DomainError;

use crate::middleware::error::{AppError, AppResult};

/// Any method, any path no route claims.
pub async fn unknown_route(req: HttpRequest) -> AppResult<HttpResponse> {
    Err(AppError(DomainError::not_found(format!(
        "Error - cannot find {} on server",
        req.uri()
    ))))
}
