//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod mailer;
mod repository;

pub use auth::{AuthError, PasswordService, ResetTokenService, TokenService};
pub use mailer::{EmailMessage, MailError, Mailer};
pub use repository::{TourRepository, UserRepository};
