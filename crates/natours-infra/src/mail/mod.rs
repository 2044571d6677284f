//! Mail delivery implementations - SMTP, plus log and in-memory fallbacks.

mod log;
mod memory;

#[cfg(feature = "smtp")]
mod smtp;

pub use log::LogMailer;
pub use memory::InMemoryMailer;

#[cfg(feature = "smtp")]
pub use smtp::{SmtpConfig, SmtpMailer};
