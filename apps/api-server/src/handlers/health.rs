//! Health check handler.

use actix_web::HttpResponse;
use natours_shared::ApiResponse;

/// GET /api/v1/health
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::message("Natours API is up"))
}
