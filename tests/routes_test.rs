// ABOUTME: Route-level integration tests over the assembled axum router
// ABOUTME: Covers status mapping, auth flows, and rate limit rejection
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{branded_record, test_context};
use mealcal_server::external::usda_client::MockUsdaClient;
use mealcal_server::routes;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_invalid_servings_maps_to_bad_request() {
    let mock = Arc::new(MockUsdaClient::with_records(vec![branded_record(
        "Pasta",
        200.0,
    )]));
    let ctx = test_context(mock.clone(), 100).await;
    let app = routes::router(ctx);

    let response = app
        .oneshot(post_json(
            "/get-calories",
            &json!({"dish_name": "pasta", "servings": 0}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(mock.call_count(), 0);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_successful_lookup_shape() {
    let mock = Arc::new(MockUsdaClient::with_records(vec![branded_record(
        "Chicken curry",
        250.0,
    )]));
    let ctx = test_context(mock, 100).await;
    let app = routes::router(ctx);

    let response = app
        .oneshot(post_json(
            "/get-calories",
            &json!({"dish_name": "chicken curry", "servings": 2}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["dish_name"], "chicken curry");
    assert_eq!(body["servings"], 2.0);
    assert_eq!(body["calories_per_serving"], 250.0);
    assert_eq!(body["total_calories"], 500.0);
    assert_eq!(body["source"], "USDA FoodData Central");
    assert_eq!(body["matched_item"], "Chicken curry");
}

#[tokio::test]
async fn test_unknown_dish_maps_to_not_found() {
    let mock = Arc::new(MockUsdaClient::with_records(vec![]));
    let ctx = test_context(mock, 100).await;
    let app = routes::router(ctx);

    let response = app
        .oneshot(post_json(
            "/get-calories",
            &json!({"dish_name": "unicorn steak", "servings": 1}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "RESOURCE_NOT_FOUND");
}

#[tokio::test]
async fn test_lookup_rate_limit_maps_to_too_many_requests() {
    let mock = Arc::new(MockUsdaClient::with_records(vec![branded_record(
        "Pasta",
        200.0,
    )]));
    let ctx = test_context(mock, 2).await;
    let app = routes::router(ctx);

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(post_json(
                "/get-calories",
                &json!({"dish_name": "pasta", "servings": 1}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .oneshot(post_json(
            "/get-calories",
            &json!({"dish_name": "pasta", "servings": 1}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "RATE_LIMIT_EXCEEDED");
}

#[tokio::test]
async fn test_register_then_login_round_trip() {
    let mock = Arc::new(MockUsdaClient::with_records(vec![]));
    let ctx = test_context(mock, 100).await;
    let app = routes::router(ctx);

    let response = app
        .clone()
        .oneshot(post_json(
            "/auth/register",
            &json!({
                "first_name": "Ada",
                "last_name": "Lovelace",
                "email": "ada@example.com",
                "password": "correct-horse-battery"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["email"], "ada@example.com");
    assert_eq!(body["first_name"], "Ada");

    let response = app
        .oneshot(post_json(
            "/auth/login",
            &json!({"email": "ada@example.com", "password": "correct-horse-battery"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["token_type"], "bearer");
    assert!(!body["access_token"].as_str().unwrap().is_empty());
    assert_eq!(body["user"]["email"], "ada@example.com");
}

#[tokio::test]
async fn test_duplicate_registration_rejected() {
    let mock = Arc::new(MockUsdaClient::with_records(vec![]));
    let ctx = test_context(mock, 100).await;
    let app = routes::router(ctx);

    let payload = json!({
        "first_name": "Ada",
        "email": "dup@example.com",
        "password": "correct-horse-battery"
    });

    let first = app
        .clone()
        .oneshot(post_json("/auth/register", &payload))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app
        .oneshot(post_json("/auth/register", &payload))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    let body = body_json(second).await;
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("already registered"));
}

#[tokio::test]
async fn test_login_with_wrong_password_is_unauthorized() {
    let mock = Arc::new(MockUsdaClient::with_records(vec![]));
    let ctx = test_context(mock, 100).await;
    let app = routes::router(ctx);

    let response = app
        .clone()
        .oneshot(post_json(
            "/auth/register",
            &json!({
                "first_name": "Ada",
                "email": "ada2@example.com",
                "password": "correct-horse-battery"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    for (email, password) in [
        ("ada2@example.com", "wrong-password-entirely"),
        ("nobody@example.com", "correct-horse-battery"),
    ] {
        let response = app
            .clone()
            .oneshot(post_json(
                "/auth/login",
                &json!({"email": email, "password": password}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn test_weak_password_rejected() {
    let mock = Arc::new(MockUsdaClient::with_records(vec![]));
    let ctx = test_context(mock, 100).await;
    let app = routes::router(ctx);

    let response = app
        .oneshot(post_json(
            "/auth/register",
            &json!({
                "first_name": "Ada",
                "email": "ada3@example.com",
                "password": "short"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_and_ready() {
    let mock = Arc::new(MockUsdaClient::with_records(vec![]));
    let ctx = test_context(mock, 100).await;
    let app = routes::router(ctx);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/ready")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["cache_backend"], "memory");
    assert_eq!(body["database"], true);
}
