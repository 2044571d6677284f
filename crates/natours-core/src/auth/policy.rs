use chrono::TimeDelta;

/// Tunables of the auth flows, built once from configuration.
#[derive(Debug, Clone)]
pub struct AuthPolicy {
    /// How long an emailed reset link stays usable.
    pub reset_token_ttl: TimeDelta,
    /// Lifetime of the access-token cookie.
    pub cookie_ttl: TimeDelta,
    /// Mark the cookie `Secure` (production).
    pub secure_cookies: bool,
    /// Sender address of reset emails.
    pub mail_from: String,
    /// Public base URL that reset links point at. Never taken from the
    /// request, whose `Host` header the client controls.
    pub public_url: String,
}

impl Default for AuthPolicy {
    fn default() -> Self {
        Self {
            reset_token_ttl: TimeDelta::minutes(10),
            cookie_ttl: TimeDelta::days(90),
            secure_cookies: false,
            mail_from: "admin@natours.com".to_string(),
            public_url: "http://127.0.0.1:8080".to_string(),
        }
    }
}
