//! Application configuration, read from the environment once at startup.

use std::env;
use std::str::FromStr;

use chrono::TimeDelta;
use natours_core::auth::AuthPolicy;
use natours_infra::{DatabaseConfig, JwtConfig};

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// SMTP relay settings; absent host means mail goes to the log.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub jwt: JwtConfig,
    pub auth: AuthPolicy,
    pub database: Option<DatabaseConfig>,
    pub email: Option<EmailConfig>,
}

fn parsed<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        };

        let defaults = JwtConfig::default();
        let jwt = JwtConfig {
            secret: env::var("JWT_SECRET_KEY").unwrap_or(defaults.secret),
            expiration_seconds: parsed("JWT_EXPIRES_IN_SECS", defaults.expiration_seconds),
            issuer: env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
        };

        // Warn if using default secret in production
        if jwt.uses_default_secret() {
            if environment.is_production() {
                tracing::error!(
                    "SECURITY: Using default JWT secret in production! Set JWT_SECRET_KEY environment variable."
                );
            } else {
                tracing::warn!("Using default JWT secret. Set JWT_SECRET_KEY for production use.");
            }
        }

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parsed("PORT", 8080);

        let policy = AuthPolicy::default();
        let auth = AuthPolicy {
            reset_token_ttl: TimeDelta::minutes(parsed("PASSWORD_RESET_TTL_MINS", 10)),
            cookie_ttl: TimeDelta::days(parsed("COOKIE_EXPIRES_IN_DAYS", 90)),
            secure_cookies: environment.is_production(),
            mail_from: env::var("EMAIL_FROM").unwrap_or(policy.mail_from),
            public_url: env::var("APP_URL").unwrap_or_else(|_| format!("http://{host}:{port}")),
        };

        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: parsed("DB_MAX_CONNECTIONS", 100),
            min_connections: parsed("DB_MIN_CONNECTIONS", 10),
        });

        let email = env::var("EMAIL_HOST").ok().map(|host| EmailConfig {
            host,
            port: parsed("EMAIL_PORT", 587),
            username: env::var("EMAIL_USER").unwrap_or_default(),
            password: env::var("EMAIL_PASS").unwrap_or_default(),
        });

        Self {
            host,
            port,
            environment,
            jwt,
            auth,
            database,
            email,
        }
    }
}
