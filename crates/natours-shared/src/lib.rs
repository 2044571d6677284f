//! # Natours Shared
//!
//! Wire types shared by the server and API clients: request bodies and the
//! `{status, data?, message?}` response envelope.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, Meta, Status};
