//! # Natours Infrastructure
//!
//! Concrete implementations of the ports defined in `natours-core`.
//! This crate contains the user and tour stores, token and hashing services,
//! and mail transports.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL user and tour stores via SeaORM
//! - `auth` - JWT + Argon2 + SHA-256 reset tokens
//! - `smtp` - SMTP mail delivery via lettre

pub mod database;
pub mod mail;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports - In-Memory
pub use database::{DatabaseConfig, InMemoryTourRepository, InMemoryUserRepository};
pub use mail::{InMemoryMailer, LogMailer};

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService, Sha256ResetTokenService};

#[cfg(feature = "postgres")]
pub use database::{PostgresTourRepository, PostgresUserRepository};

#[cfg(feature = "smtp")]
pub use mail::{SmtpConfig, SmtpMailer};
