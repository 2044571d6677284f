//! Authentication extractor.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use futures::future::LocalBoxFuture;

use natours_core::DomainError;
use natours_core::auth::authorize;
use natours_core::domain::{Authenticated, Role};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Authenticated user identity extractor.
///
/// Use this in handlers to require a valid, non-stale bearer token:
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, {}!", identity.user().name)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity(pub Authenticated);

impl Identity {
    pub fn user(&self) -> &natours_core::domain::User {
        &self.0.user
    }

    /// Fail with 403 unless the user holds one of `roles`.
    pub fn require_role(&self, roles: &[Role]) -> AppResult<()> {
        Ok(authorize(&self.0, roles)?)
    }

    pub fn into_inner(self) -> Authenticated {
        self.0
    }
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        // A header that is not visible ASCII reads as malformed
        let authorization = req
            .headers()
            .get(header::AUTHORIZATION)
            .map(|value| value.to_str().unwrap_or_default().to_string());

        Box::pin(async move {
            let state = state.ok_or_else(|| {
                tracing::error!("AppState not found in app data");
                AppError(DomainError::Internal("Server configuration error".to_string()))
            })?;

            let authenticated = state.auth.authenticate(authorization.as_deref()).await?;
            Ok(Identity(authenticated))
        })
    }
}
