//! Tests for `AppError` → HTTP response mapping.
//!
//! Most call `IntoResponse` directly on `AppError` values; the extractor
//! tests at the end send malformed requests through the full router.

mod common;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request, StatusCode};
use axum::response::IntoResponse;
use clapper_api::error::AppError;
use clapper_api::router::handle_panic;
use clapper_core::error::CoreError;
use common::{body_json, build_test_app, get, post_json};
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt;

/// Convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

// ---------------------------------------------------------------------------
// Test: CoreError::NotFound maps to 404 with NOT_FOUND code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::shoot_day_not_found(42));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "ShootDay with id 42 not found");
}

// ---------------------------------------------------------------------------
// Test: CoreError::Validation maps to 400 with VALIDATION_ERROR code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn validation_error_returns_400() {
    let err = AppError::Core(CoreError::Validation(
        "A shoot day already exists for 2024-05-01 (id 3)".into(),
    ));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "A shoot day already exists for 2024-05-01 (id 3)");
}

// ---------------------------------------------------------------------------
// Test: CoreError::Persistence maps to 503 and sanitizes the message
// ---------------------------------------------------------------------------

#[tokio::test]
async fn persistence_error_returns_503_and_sanitizes() {
    let err = AppError::Core(CoreError::Persistence(
        "connection to 10.0.0.5:5432 refused".into(),
    ));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["code"], "PERSISTENCE_ERROR");
    assert!(
        !json.to_string().contains("10.0.0.5"),
        "Persistence error response must not leak connection details"
    );
}

// ---------------------------------------------------------------------------
// Test: AppError::BadRequest maps to 400 with BAD_REQUEST code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bad_request_error_returns_400() {
    let err = AppError::BadRequest("invalid field value".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "invalid field value");
}

// ---------------------------------------------------------------------------
// Test: AppError::InternalError maps to 500 and sanitizes the message
// ---------------------------------------------------------------------------

#[tokio::test]
async fn internal_error_returns_500_and_sanitizes_message() {
    let err = AppError::InternalError("secret database credentials leaked".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert!(!json.to_string().contains("secret"));
    assert_eq!(json["error"], "An internal error occurred");
}

// ---------------------------------------------------------------------------
// Test: A handler panic becomes a sanitised INTERNAL_ERROR response
// ---------------------------------------------------------------------------

#[tokio::test]
async fn panic_payload_maps_to_internal_error() {
    let response = handle_panic(Box::new("index out of bounds at 10.0.0.5"));
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert!(!json.to_string().contains("10.0.0.5"));
}

// ---------------------------------------------------------------------------
// Test: Malformed JSON bodies use the error envelope
// ---------------------------------------------------------------------------

#[tokio::test]
async fn malformed_json_body_returns_400_envelope() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/projects")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();

    let response = build_test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers().get(CONTENT_TYPE).unwrap(),
        "application/json"
    );
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn wrong_json_shape_returns_400_envelope() {
    let response = post_json(
        build_test_app(),
        "/api/v1/projects",
        json!({ "name": ["not", "a", "string"] }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn missing_content_type_returns_400_envelope() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/projects")
        .body(Body::from(json!({ "name": "No header" }).to_string()))
        .unwrap();

    let response = build_test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

// ---------------------------------------------------------------------------
// Test: Non-numeric path ids use the error envelope
// ---------------------------------------------------------------------------

#[tokio::test]
async fn non_numeric_path_id_returns_400_envelope() {
    let response = get(build_test_app(), "/api/v1/shoot-days/abc").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}
