//! Values produced by the auth pipeline and threaded between its steps.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{User, UserProfile};

/// Name of the cookie that carries the access token.
pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";

/// Decoded payload of a verified access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessClaims {
    pub user_id: Uuid,
    /// Unix seconds.
    pub issued_at: i64,
    /// Unix milliseconds; what staleness is judged on.
    pub issued_at_ms: i64,
    /// Unix seconds.
    pub expires_at: i64,
}

/// How the access token should be persisted client side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookiePolicy {
    pub name: &'static str,
    pub value: String,
    pub expires: DateTime<Utc>,
    pub secure: bool,
    pub http_only: bool,
}

/// Result of every flow that mints a token: sign-up, sign-in, reset and
/// update password.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub access_token: String,
    pub cookie: CookiePolicy,
}

impl Session {
    pub fn profile(&self) -> UserProfile {
        self.user.profile()
    }
}

/// Output of the authenticate step. Holding one proves the bearer token was
/// verified and is not stale, so protected steps take it by value or reference.
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub user: User,
    pub claims: AccessClaims,
}
