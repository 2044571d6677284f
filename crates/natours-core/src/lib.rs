//! # Natours Core
//!
//! The domain layer of the Natours backend.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! the query-string translation layer, the tour catalogue and the
//! authentication state machine.

pub mod auth;
pub mod domain;
pub mod error;
pub mod ports;
pub mod query;
pub mod tours;
pub mod users;

pub use error::DomainError;
