//! Account handlers for the signed-in user, plus the admin listing.

use actix_web::{HttpRequest, HttpResponse, web};

use natours_core::auth::ProfileUpdate;
use natours_core::domain::Role;
use natours_core::query::QueryParams;
use natours_core::users;
use natours_shared::ApiResponse;
use natours_shared::dto::{UpdateUserRequest, UserData, UsersData};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/v1/users/me
pub async fn me(identity: Identity) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::ok(UserData {
        user: identity.user().profile(),
    })))
}

/// PATCH /api/v1/users/update-user
pub async fn update_user(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<UpdateUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let user = state
        .auth
        .update_profile(
            identity.into_inner(),
            ProfileUpdate {
                name: req.name,
                email: req.email,
                password: req.password,
                password_confirm: req.password_confirm,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(UserData {
        user: user.profile(),
    })))
}

/// DELETE /api/v1/users/delete-user
pub async fn delete_user(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    state.auth.deactivate(identity.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/v1/users?role=guide&sort=name&fields=name,email&page=2&limit=10
pub async fn list_users(
    state: web::Data<AppState>,
    identity: Identity,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    identity.require_role(&[Role::Admin])?;

    let params = QueryParams::parse(req.query_string());
    let found = users::list_users(state.auth.users().as_ref(), &params).await?;

    let results = found.len();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(UsersData { users: found }).with_meta(results)))
}
