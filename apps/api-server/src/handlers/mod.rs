//! HTTP handlers and route configuration.

mod auth;
mod fallback;
mod health;
mod tours;
mod users;

use actix_web::web;

pub use fallback::unknown_route;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/users")
                    // Public routes
                    .route("/signup", web::post().to(auth::sign_up))
                    .route("/signin", web::post().to(auth::sign_in))
                    .route("/forgot-password", web::post().to(auth::forgot_password))
                    .route(
                        "/reset-password/{resetToken}",
                        web::patch().to(auth::reset_password),
                    )
                    // Authenticated routes
                    .route("/update-password", web::patch().to(auth::update_password))
                    .route("/me", web::get().to(users::me))
                    .route("/update-user", web::patch().to(users::update_user))
                    .route("/delete-user", web::delete().to(users::delete_user))
                    // Admin routes
                    .route("", web::get().to(users::list_users)),
            )
            .service(
                web::scope("/tours")
                    // Public routes
                    .route("/stats", web::get().to(tours::tour_stats))
                    .route("/monthly-plan/{year}", web::get().to(tours::monthly_plan))
                    .route("/{tourId}", web::get().to(tours::get_tour))
                    // Authenticated routes
                    .route("", web::get().to(tours::list_tours))
                    // Lead-guide and admin routes
                    .route("", web::post().to(tours::create_tour))
                    .route("/{tourId}", web::patch().to(tours::update_tour))
                    .route("/{tourId}", web::delete().to(tours::delete_tour)),
            ),
    );
}
