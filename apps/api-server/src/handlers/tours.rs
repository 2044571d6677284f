//! Tour catalogue handlers.

use actix_web::{HttpRequest, HttpResponse, web};

use natours_core::DomainError;
use natours_core::domain::Role;
use natours_core::query::QueryParams;
use natours_core::tours::TourInput;
use natours_shared::ApiResponse;
use natours_shared::dto::{PlanData, StatsData, TourData, TourRequest, ToursData};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// Roles that may change the catalogue.
const CURATORS: [Role; 2] = [Role::LeadGuide, Role::Admin];

fn tour_input(req: TourRequest) -> TourInput {
    TourInput {
        name: req.name,
        duration: req.duration,
        max_group_size: req.max_group_size,
        difficulty: req.difficulty,
        ratings_average: req.ratings_average,
        ratings_quantity: req.ratings_quantity,
        price: req.price,
        price_discount: req.price_discount,
        summary: req.summary,
        description: req.description,
        image_cover: req.image_cover,
        images: req.images,
        start_dates: req.start_dates,
        secret_tour: req.secret_tour,
    }
}

/// GET /api/v1/tours?price[gte]=500&sort=-ratingsAverage,price&fields=name,price&page=1&limit=5
pub async fn list_tours(
    state: web::Data<AppState>,
    _identity: Identity,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let params = QueryParams::parse(req.query_string());
    let found = state.tours.list(&params).await?;

    let results = found.len();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(ToursData { tours: found }).with_meta(results)))
}

/// GET /api/v1/tours/{tourId}
pub async fn get_tour(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let tour = state.tours.get(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(TourData { tour: tour.view() })))
}

/// POST /api/v1/tours
pub async fn create_tour(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<TourRequest>,
) -> AppResult<HttpResponse> {
    identity.require_role(&CURATORS)?;

    let tour = state.tours.create(tour_input(body.into_inner())).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(TourData { tour: tour.view() })))
}

/// PATCH /api/v1/tours/{tourId}
pub async fn update_tour(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    body: web::Json<TourRequest>,
) -> AppResult<HttpResponse> {
    identity.require_role(&CURATORS)?;

    let tour = state
        .tours
        .update(&path.into_inner(), tour_input(body.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(TourData { tour: tour.view() })))
}

/// DELETE /api/v1/tours/{tourId}
pub async fn delete_tour(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    identity.require_role(&CURATORS)?;

    state.tours.delete(&path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/v1/tours/stats
pub async fn tour_stats(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let stats = state.tours.stats().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(StatsData { stats })))
}

/// GET /api/v1/tours/monthly-plan/{year}
pub async fn monthly_plan(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let year: i32 = path
        .trim()
        .parse()
        .map_err(|_| DomainError::validation("Please provide a valid year"))?;

    let plan = state.tours.monthly_plan(year).await?;
    let results = plan.len();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(PlanData { plan }).with_meta(results)))
}
