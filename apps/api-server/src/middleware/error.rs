//! Error handling - every failure leaves as a `{status, message}` envelope.

use actix_web::{HttpRequest, HttpResponse, ResponseError, error::JsonPayloadError, http::StatusCode};
use natours_core::DomainError;
use natours_shared::ApiResponse;
use std::fmt;

/// Application-level error type; wraps the domain taxonomy and fixes the
/// HTTP status of each kind.
#[derive(Debug)]
pub struct AppError(pub DomainError);

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            DomainError::Validation(_) | DomainError::Conflict(_) => StatusCode::BAD_REQUEST,
            DomainError::Authentication(_) => StatusCode::UNAUTHORIZED,
            DomainError::Authorization(_) => StatusCode::FORBIDDEN,
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Duplicate(_) => StatusCode::CONFLICT,
            DomainError::Delivery(_) | DomainError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = match &self.0 {
            DomainError::Internal(detail) => {
                // Log internal errors
                tracing::error!("Internal error: {}", detail);
                "Something went wrong".to_string()
            }
            DomainError::Delivery(detail) => {
                tracing::error!("Delivery error: {}", detail);
                detail.clone()
            }
            other => other.to_string(),
        };

        HttpResponse::build(status).json(ApiResponse::from_error(status.as_u16(), message))
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        AppError(err)
    }
}

/// Malformed JSON bodies become validation failures instead of actix's
/// plain-text default.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(error = %err, "Rejected request body");
    AppError(DomainError::validation(format!("Invalid request body: {err}"))).into()
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
