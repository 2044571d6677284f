//! Data Transfer Objects - request/response types for the API.
//!
//! Request fields are optional: absence is reported by the server with a
//! field-specific message rather than a generic decode error.

use serde::{Deserialize, Serialize};

/// POST /api/v1/users/signup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SignUpRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirm: Option<String>,
    pub photo: Option<String>,
}

/// POST /api/v1/users/signin
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SignInRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /api/v1/users/forgot-password
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ForgotPasswordRequest {
    pub email: Option<String>,
}

/// PATCH /api/v1/users/reset-password/{resetToken}
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub password: Option<String>,
    pub password_confirm: Option<String>,
}

/// PATCH /api/v1/users/update-password
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub old_password: Option<String>,
    pub new_password: Option<String>,
    pub new_password_confirm: Option<String>,
}

/// PATCH /api/v1/users/update-user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirm: Option<String>,
}

/// `data` of responses carrying one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserData<T> {
    pub user: T,
}

/// `data` of list responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsersData<T> {
    pub users: Vec<T>,
}

/// POST /api/v1/tours and PATCH /api/v1/tours/{tourId}
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TourRequest {
    pub name: Option<String>,
    pub duration: Option<i32>,
    pub max_group_size: Option<i32>,
    pub difficulty: Option<String>,
    pub ratings_average: Option<f64>,
    pub ratings_quantity: Option<i32>,
    pub price: Option<f64>,
    pub price_discount: Option<f64>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub image_cover: Option<String>,
    pub images: Option<Vec<String>>,
    pub start_dates: Option<Vec<String>>,
    pub secret_tour: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TourData<T> {
    pub tour: T,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToursData<T> {
    pub tours: Vec<T>,
}

/// `data` of GET /api/v1/tours/stats
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsData<T> {
    pub stats: Vec<T>,
}

/// `data` of GET /api/v1/tours/monthly-plan/{year}
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanData<T> {
    pub plan: Vec<T>,
}
