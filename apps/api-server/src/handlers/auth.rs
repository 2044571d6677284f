//! Authentication handlers: sign-up, sign-in and the password flows.

use actix_web::cookie::{Cookie, time::OffsetDateTime};
use actix_web::{HttpResponse, HttpResponseBuilder, web};

use natours_core::auth::{PasswordReset, PasswordUpdate, SignIn, SignUp};
use natours_core::domain::{CookiePolicy, Session};
use natours_shared::ApiResponse;
use natours_shared::dto::{
    ForgotPasswordRequest, ResetPasswordRequest, SignInRequest, SignUpRequest,
    UpdatePasswordRequest, UserData,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/v1/users/signup
pub async fn sign_up(
    state: web::Data<AppState>,
    body: web::Json<SignUpRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let session = state
        .auth
        .sign_up(SignUp {
            name: req.name,
            email: req.email,
            password: req.password,
            password_confirm: req.password_confirm,
            photo: req.photo,
        })
        .await?;

    Ok(with_profile(HttpResponse::Created(), session))
}

/// POST /api/v1/users/signin
pub async fn sign_in(
    state: web::Data<AppState>,
    body: web::Json<SignInRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let session = state
        .auth
        .sign_in(SignIn {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(with_profile(HttpResponse::Ok(), session))
}

/// POST /api/v1/users/forgot-password
///
/// The reset link is built from the configured `APP_URL`.
pub async fn forgot_password(
    state: web::Data<AppState>,
    body: web::Json<ForgotPasswordRequest>,
) -> AppResult<HttpResponse> {
    let requested = state.auth.forgot_password(body.email.as_deref()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message(requested.message)))
}

/// PATCH /api/v1/users/reset-password/{resetToken}
pub async fn reset_password(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<ResetPasswordRequest>,
) -> AppResult<HttpResponse> {
    let reset_token = path.into_inner();
    let req = body.into_inner();
    let session = state
        .auth
        .reset_password(
            &reset_token,
            PasswordReset {
                password: req.password,
                password_confirm: req.password_confirm,
            },
        )
        .await?;

    Ok(with_token(HttpResponse::Ok(), session))
}

/// PATCH /api/v1/users/update-password
pub async fn update_password(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<UpdatePasswordRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let session = state
        .auth
        .update_password(
            identity.into_inner(),
            PasswordUpdate {
                old_password: req.old_password,
                new_password: req.new_password,
                new_password_confirm: req.new_password_confirm,
            },
        )
        .await?;

    Ok(with_token(HttpResponse::Ok(), session))
}

/// Token, cookie and the public profile.
fn with_profile(mut builder: HttpResponseBuilder, session: Session) -> HttpResponse {
    let body = ApiResponse::ok(UserData {
        user: session.profile(),
    })
    .with_access_token(session.access_token.clone());

    builder.cookie(access_cookie(&session.cookie)).json(body)
}

/// Token and cookie only.
fn with_token(mut builder: HttpResponseBuilder, session: Session) -> HttpResponse {
    builder
        .cookie(access_cookie(&session.cookie))
        .json(ApiResponse::token(session.access_token))
}

pub(crate) fn access_cookie(policy: &CookiePolicy) -> Cookie<'static> {
    let mut cookie = Cookie::build(policy.name, policy.value.clone())
        .path("/")
        .secure(policy.secure)
        .http_only(policy.http_only)
        .finish();

    match OffsetDateTime::from_unix_timestamp(policy.expires.timestamp()) {
        Ok(expires) => cookie.set_expires(expires),
        Err(e) => tracing::warn!(error = %e, "Cookie expiry out of range, using session cookie"),
    }
    cookie
}
