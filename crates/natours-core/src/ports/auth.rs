//! Authentication ports: access tokens, password hashing, reset tokens.

use uuid::Uuid;

use crate::domain::AccessClaims;

/// Issues and verifies signed, time-bounded access tokens.
pub trait TokenService: Send + Sync {
    /// Mint a token for `user_id`, stamped with the current time.
    fn issue_token(&self, user_id: Uuid) -> Result<String, AuthError>;

    /// Decode a token, checking signature and expiry.
    fn verify_token(&self, token: &str) -> Result<AccessClaims, AuthError>;

    /// Lifetime of issued tokens.
    fn expiration_seconds(&self) -> i64;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Password-reset token primitives. Only the digest is ever persisted.
pub trait ResetTokenService: Send + Sync {
    /// A fresh high-entropy token, handed out once.
    fn generate(&self) -> String;

    /// Deterministic one-way digest of a raw token.
    fn hash(&self, raw_token: &str) -> String;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token signing failed: {0}")]
    Signing(String),

    #[error("Hashing error: {0}")]
    HashingError(String),
}
