//! Application state - shared across all handlers.

use std::sync::Arc;

use natours_core::auth::AuthService;
use natours_core::ports::{Mailer, TourRepository, UserRepository};
use natours_core::tours::TourService;
use natours_infra::{
    Argon2PasswordService, InMemoryTourRepository, InMemoryUserRepository, JwtTokenService,
    LogMailer, Sha256ResetTokenService,
};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub tours: TourService,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let (users, tours) = repositories(config).await;
        let mailer = mailer(config);

        let auth = AuthService::new(
            users,
            Arc::new(JwtTokenService::new(config.jwt.clone())),
            Arc::new(Argon2PasswordService::new()),
            Arc::new(Sha256ResetTokenService::new()),
            mailer,
            config.auth.clone(),
        );

        tracing::info!("Application state initialized");
        Self {
            auth,
            tours: TourService::new(tours),
        }
    }

    pub fn from_services(auth: AuthService, tours: TourService) -> Self {
        Self { auth, tours }
    }
}

type Repositories = (Arc<dyn UserRepository>, Arc<dyn TourRepository>);

fn in_memory() -> Repositories {
    (
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(InMemoryTourRepository::new()),
    )
}

#[cfg(feature = "postgres")]
async fn repositories(config: &AppConfig) -> Repositories {
    use natours_infra::database::connect;
    use natours_infra::{PostgresTourRepository, PostgresUserRepository};

    let Some(db_config) = config.database.as_ref() else {
        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        return in_memory();
    };

    match connect(db_config).await {
        Ok(conn) => (
            Arc::new(PostgresUserRepository::new(conn.clone())),
            Arc::new(PostgresTourRepository::new(conn)),
        ),
        Err(e) => {
            tracing::error!(
                "Failed to connect to database: {}. Using in-memory fallback.",
                e
            );
            in_memory()
        }
    }
}

#[cfg(not(feature = "postgres"))]
async fn repositories(_config: &AppConfig) -> Repositories {
    tracing::info!("Running without postgres feature - using in-memory repositories");
    in_memory()
}

#[cfg(feature = "smtp")]
fn mailer(config: &AppConfig) -> Arc<dyn Mailer> {
    use natours_infra::{SmtpConfig, SmtpMailer};

    let Some(email) = config.email.as_ref() else {
        if config.environment.is_production() {
            tracing::error!("EMAIL_HOST not set in production. Password reset emails will not be delivered.");
        } else {
            tracing::warn!("EMAIL_HOST not set. Email summaries will be written to the log.");
        }
        return Arc::new(LogMailer);
    };

    let smtp = SmtpConfig {
        host: email.host.clone(),
        port: email.port,
        username: email.username.clone(),
        password: email.password.clone(),
        use_tls: config.environment.is_production(),
    };

    match SmtpMailer::new(&smtp) {
        Ok(mailer) => Arc::new(mailer),
        Err(e) => {
            tracing::error!("Failed to build SMTP transport: {}. Using log mailer.", e);
            Arc::new(LogMailer)
        }
    }
}

#[cfg(not(feature = "smtp"))]
fn mailer(_config: &AppConfig) -> Arc<dyn Mailer> {
    tracing::info!("Running without smtp feature - emails go to the log");
    Arc::new(LogMailer)
}
