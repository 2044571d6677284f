//! End-to-end tests of the `/api/v1/tours` routes over in-memory adapters.

#[macro_use]
mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{Value, json};

use common::{Fixture, bearer, fixture};
use natours_core::auth::SignUp;
use natours_core::domain::Role;
use natours_core::ports::{TourRepository, UserRepository};

/// Register `email` with `role` and return its access token.
async fn token_for(fx: &Fixture, email: &str, role: Role) -> String {
    let session = fx
        .state
        .auth
        .sign_up(SignUp {
            name: Some("Staff".into()),
            email: Some(email.into()),
            password: Some("pass1234".into()),
            password_confirm: Some("pass1234".into()),
            photo: None,
        })
        .await
        .unwrap();

    let mut user = session.user;
    user.role = role;
    fx.users.save(user).await.unwrap();

    session.access_token
}

fn tour_body(name: &str, price: f64) -> Value {
    json!({
        "name": name,
        "duration": 5,
        "maxGroupSize": 25,
        "difficulty": "easy",
        "price": price,
        "summary": "Breathtaking hike",
        "imageCover": "tour-1-cover.jpg",
        "startDates": ["2021-04-25,10:00", "2021-07-20,10:00"]
    })
}

#[actix_rt::test]
async fn test_tour_crud_by_lead_guide() {
    let fx = fixture();
    let app = init_app!(fx);
    let lead = token_for(&fx, "lead@example.com", Role::LeadGuide).await;

    let create = test::TestRequest::post()
        .uri("/api/v1/tours")
        .insert_header(bearer(&lead))
        .set_json(tour_body("The Forest Hiker", 397.0))
        .to_request();
    let resp = test::call_service(&app, create).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let tour = &body["data"]["tour"];
    assert_eq!(tour["slug"], "the-forest-hiker");
    assert_eq!(tour["ratingsAverage"], 4.5);
    let id = tour["id"].as_str().unwrap().to_string();

    let fetched = test::TestRequest::get()
        .uri(&format!("/api/v1/tours/{id}"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, fetched).await;
    assert_eq!(body["data"]["tour"]["name"], "The Forest Hiker");

    let patch = test::TestRequest::patch()
        .uri(&format!("/api/v1/tours/{id}"))
        .insert_header(bearer(&lead))
        .set_json(json!({"price": 497, "priceDiscount": 50}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, patch).await;
    assert_eq!(body["data"]["tour"]["price"], 497.0);
    assert_eq!(body["data"]["tour"]["priceDiscount"], 50.0);

    let bad_discount = test::TestRequest::patch()
        .uri(&format!("/api/v1/tours/{id}"))
        .insert_header(bearer(&lead))
        .set_json(json!({"priceDiscount": 900}))
        .to_request();
    let resp = test::call_service(&app, bad_discount).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Error - price discount of 900 must be less than price");

    let delete = test::TestRequest::delete()
        .uri(&format!("/api/v1/tours/{id}"))
        .insert_header(bearer(&lead))
        .to_request();
    assert_eq!(test::call_service(&app, delete).await.status(), StatusCode::NO_CONTENT);

    let gone = test::TestRequest::get()
        .uri(&format!("/api/v1/tours/{id}"))
        .to_request();
    let resp = test::call_service(&app, gone).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], format!("could not find tour with id {id}"));
}

#[actix_rt::test]
async fn test_delete_is_limited_to_lead_guides_and_admins() {
    let fx = fixture();
    let app = init_app!(fx);
    let admin = token_for(&fx, "admin@example.com", Role::Admin).await;
    let guide = token_for(&fx, "guide@example.com", Role::Guide).await;

    let create = test::TestRequest::post()
        .uri("/api/v1/tours")
        .insert_header(bearer(&admin))
        .set_json(tour_body("The Sea Explorer", 497.0))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, create).await;
    let id = body["data"]["tour"]["id"].as_str().unwrap().to_string();

    let by_guide = test::TestRequest::delete()
        .uri(&format!("/api/v1/tours/{id}"))
        .insert_header(bearer(&guide))
        .to_request();
    let resp = test::call_service(&app, by_guide).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "User not allowed to perform this operation");

    let anonymous = test::TestRequest::delete()
        .uri(&format!("/api/v1/tours/{id}"))
        .to_request();
    assert_eq!(test::call_service(&app, anonymous).await.status(), StatusCode::UNAUTHORIZED);

    let create_by_guide = test::TestRequest::post()
        .uri("/api/v1/tours")
        .insert_header(bearer(&guide))
        .set_json(tour_body("The Snow Adventurer", 997.0))
        .to_request();
    assert_eq!(
        test::call_service(&app, create_by_guide).await.status(),
        StatusCode::FORBIDDEN
    );

    let by_admin = test::TestRequest::delete()
        .uri(&format!("/api/v1/tours/{id}"))
        .insert_header(bearer(&admin))
        .to_request();
    assert_eq!(test::call_service(&app, by_admin).await.status(), StatusCode::NO_CONTENT);
    assert!(fx.tours.find_by_name("The Sea Explorer").await.unwrap().is_none());
}

#[actix_rt::test]
async fn test_list_tours_filters_prices_numerically() {
    let fx = fixture();
    let app = init_app!(fx);
    let admin = token_for(&fx, "admin@example.com", Role::Admin).await;

    for (name, price) in [
        ("The City Wanderer", 97.0),
        ("The Forest Hiker", 497.0),
        ("The Sea Explorer", 997.0),
        ("The Snow Adventurer", 1197.0),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/v1/tours")
            .insert_header(bearer(&admin))
            .set_json(tour_body(name, price))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    let anonymous = test::TestRequest::get().uri("/api/v1/tours").to_request();
    assert_eq!(test::call_service(&app, anonymous).await.status(), StatusCode::UNAUTHORIZED);

    let listed = test::TestRequest::get()
        .uri("/api/v1/tours?price[gte]=500&sort=-price&fields=name,price")
        .insert_header(bearer(&admin))
        .to_request();
    let resp = test::call_service(&app, listed).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["meta"]["results"], 2);
    let tours = body["data"]["tours"].as_array().unwrap();
    assert_eq!(tours[0]["name"], "The Snow Adventurer");
    assert_eq!(tours[1]["name"], "The Sea Explorer");
    assert!(tours[0].get("summary").is_none());

    let unknown_op = test::TestRequest::get()
        .uri("/api/v1/tours?name[regex]=Sea")
        .insert_header(bearer(&admin))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, unknown_op).await;
    assert_eq!(body["meta"]["results"], 0);

    let paged = test::TestRequest::get()
        .uri("/api/v1/tours?sort=price&page=2&limit=3")
        .insert_header(bearer(&admin))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, paged).await;
    assert_eq!(body["data"]["tours"][0]["name"], "The Snow Adventurer");
}

#[actix_rt::test]
async fn test_stats_and_monthly_plan() {
    let fx = fixture();
    let app = init_app!(fx);
    let admin = token_for(&fx, "admin@example.com", Role::Admin).await;

    for (name, price) in [("The Forest Hiker", 400.0), ("The Sea Explorer", 600.0)] {
        let req = test::TestRequest::post()
            .uri("/api/v1/tours")
            .insert_header(bearer(&admin))
            .set_json(tour_body(name, price))
            .to_request();
        test::call_service(&app, req).await;
    }

    let stats = test::TestRequest::get().uri("/api/v1/tours/stats").to_request();
    let body: Value = test::call_and_read_body_json(&app, stats).await;
    let easy = &body["data"]["stats"][0];
    assert_eq!(easy["difficulty"], "EASY");
    assert_eq!(easy["numTours"], 2);
    assert_eq!(easy["avgPrice"], 500.0);

    let plan = test::TestRequest::get()
        .uri("/api/v1/tours/monthly-plan/2021")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, plan).await;
    assert_eq!(body["meta"]["results"], 2);
    assert_eq!(body["data"]["plan"][0]["numTourStarts"], 2);

    let bad_year = test::TestRequest::get()
        .uri("/api/v1/tours/monthly-plan/soon")
        .to_request();
    let resp = test::call_service(&app, bad_year).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Please provide a valid year");
}

#[actix_rt::test]
async fn test_malformed_tour_id_is_not_found() {
    let fx = fixture();
    let app = init_app!(fx);

    let req = test::TestRequest::get().uri("/api/v1/tours/42").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "could not find tour with id 42");
}
