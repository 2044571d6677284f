//! # Natours API Server
//!
//! HTTP surface of the Natours user and authentication service. The binary in
//! `main.rs` wires configuration and telemetry; everything needed to build an
//! `App` lives here so integration tests can drive the same routes.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod state;
pub mod telemetry;

use actix_web::web;

use crate::middleware::error::json_error_handler;

/// Routes, the JSON 404 fallback and request-body error handling.
pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .configure(handlers::configure_routes)
        .default_service(web::to(handlers::unknown_route));
}
