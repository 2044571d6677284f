//! Shared fixture for the HTTP tests: in-memory adapters behind the real
//! routes.

#![allow(dead_code)]

use std::sync::Arc;

use actix_web::http::header;
use serde_json::{Value, json};

use api_server::state::AppState;
use natours_core::auth::{AuthPolicy, AuthService};
use natours_core::tours::TourService;
use natours_infra::{
    Argon2PasswordService, InMemoryMailer, InMemoryTourRepository, InMemoryUserRepository,
    JwtConfig, JwtTokenService, Sha256ResetTokenService,
};

pub const PUBLIC_URL: &str = "https://natours.example";

pub struct Fixture {
    pub state: AppState,
    pub users: Arc<InMemoryUserRepository>,
    pub tours: Arc<InMemoryTourRepository>,
    pub mailer: Arc<InMemoryMailer>,
}

pub fn fixture() -> Fixture {
    let users = Arc::new(InMemoryUserRepository::new());
    let tours = Arc::new(InMemoryTourRepository::new());
    let mailer = Arc::new(InMemoryMailer::new());
    let auth = AuthService::new(
        users.clone(),
        Arc::new(JwtTokenService::new(JwtConfig {
            secret: "integration-test-secret".to_string(),
            ..JwtConfig::default()
        })),
        Arc::new(Argon2PasswordService::new()),
        Arc::new(Sha256ResetTokenService::new()),
        mailer.clone(),
        AuthPolicy {
            public_url: PUBLIC_URL.to_string(),
            ..AuthPolicy::default()
        },
    );

    Fixture {
        state: AppState::from_services(auth, TourService::new(tours.clone())),
        users,
        tours,
        mailer,
    }
}

macro_rules! init_app {
    ($fixture:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($fixture.state.clone()))
                .configure(api_server::configure_app),
        )
        .await
    };
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

pub fn signup_body(name: &str, email: &str) -> Value {
    json!({
        "name": name,
        "email": email,
        "password": "pass1234",
        "passwordConfirm": "pass1234"
    })
}
