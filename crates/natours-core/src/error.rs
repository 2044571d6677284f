//! Domain-level error types.

use thiserror::Error;

use crate::ports::{AuthError, MailError};

/// Domain errors - business logic failures.
///
/// Every user-facing check fails with the first violated precondition; the
/// message echoes that precondition back to the API consumer.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Missing or malformed input field.
    #[error("{0}")]
    Validation(String),

    /// Missing, invalid, expired, tampered or stale credentials.
    #[error("{0}")]
    Authentication(String),

    /// Authenticated, but the role is not permitted.
    #[error("{0}")]
    Authorization(String),

    #[error("{0}")]
    NotFound(String),

    /// Two supplied values that must agree do not (password/confirmation).
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Duplicate(String),

    /// The email collaborator failed to deliver a message.
    #[error("{0}")]
    Delivery(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => DomainError::NotFound("Resource not found".to_string()),
            RepoError::Constraint(msg) => DomainError::Duplicate(msg),
            RepoError::Connection(msg) | RepoError::Query(msg) => DomainError::Internal(msg),
        }
    }
}

impl From<AuthError> for DomainError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::TokenExpired | AuthError::InvalidToken(_) => DomainError::Authentication(
                "Access token has expired or been tampered with".to_string(),
            ),
            AuthError::HashingError(msg) | AuthError::Signing(msg) => DomainError::Internal(msg),
        }
    }
}

impl From<MailError> for DomainError {
    fn from(err: MailError) -> Self {
        DomainError::Delivery(err.to_string())
    }
}
