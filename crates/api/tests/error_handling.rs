//! Tests for `AppError` → HTTP response mapping.
//!
//! These tests call `IntoResponse` directly on `AppError` values; no HTTP
//! server or database is needed.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use cradle_api::error::AppError;
use cradle_core::error::CoreError;
use cradle_core::messages::Locale;
use http_body_util::BodyExt;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

// ---------------------------------------------------------------------------
// Owner-facing mapping
// ---------------------------------------------------------------------------

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "Item",
        id: 42,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Item with id 42 not found");
}

#[tokio::test]
async fn validation_error_returns_400() {
    let err = AppError::Core(CoreError::Validation("item name is required".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "item name is required");
}

#[tokio::test]
async fn already_fulfilled_returns_409() {
    let err = AppError::Core(CoreError::AlreadyFulfilled { item_id: 7 });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "ALREADY_FULFILLED");
    assert_eq!(json["error"], "Item 7 is already fulfilled");
}

#[tokio::test]
async fn insufficient_remaining_returns_409_with_remaining() {
    let err = AppError::Core(CoreError::InsufficientRemaining {
        item_id: 7,
        requested: 3,
        remaining: 2,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "INSUFFICIENT_REMAINING");
    assert_eq!(json["remaining"], 2);
}

#[tokio::test]
async fn conflict_error_returns_409() {
    let err = AppError::Core(CoreError::Conflict("item changed".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
    assert_eq!(json["error"], "item changed");
}

#[tokio::test]
async fn store_unavailable_returns_503_without_details() {
    let err = AppError::Core(CoreError::StoreUnavailable(
        "connection refused to db-primary:5432".into(),
    ));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["code"], "STORE_UNAVAILABLE");
    assert!(!json.to_string().contains("db-primary"));
}

#[tokio::test]
async fn row_not_found_maps_to_404() {
    let err = AppError::Database(sqlx::Error::RowNotFound);

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn pool_timeout_maps_to_503() {
    let err = AppError::Database(sqlx::Error::PoolTimedOut);

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["code"], "STORE_UNAVAILABLE");
}

// ---------------------------------------------------------------------------
// Guest-facing mapping
// ---------------------------------------------------------------------------

#[tokio::test]
async fn guest_insufficient_remaining_is_localized() {
    let source = CoreError::InsufficientRemaining {
        item_id: 1,
        requested: 4,
        remaining: 2,
    };
    let err = AppError::Core(source).for_guest(Locale::En);

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "INSUFFICIENT_REMAINING");
    assert_eq!(json["remaining"], 2);
    assert!(json["error"].as_str().unwrap().starts_with("Only 2 left"));
}

#[tokio::test]
async fn guest_already_fulfilled_in_spanish() {
    let err = AppError::Core(CoreError::AlreadyFulfilled { item_id: 1 }).for_guest(Locale::Es);

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "ALREADY_FULFILLED");
    assert!(json["error"].as_str().unwrap().starts_with("Alguien ya compró"));
}

#[tokio::test]
async fn guest_store_outage_is_marked_retryable() {
    let err = AppError::Core(CoreError::StoreUnavailable("timeout".into())).for_guest(Locale::En);

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["code"], "STORE_UNAVAILABLE");
    assert_eq!(json["retryable"], true);
    assert!(!json.to_string().contains("timeout"));
}

#[tokio::test]
async fn for_guest_leaves_database_errors_alone() {
    let err = AppError::Database(sqlx::Error::RowNotFound).for_guest(Locale::Es);

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Resource not found");
}

#[tokio::test]
async fn unclassified_database_error_returns_500_and_sanitizes() {
    let err = AppError::Database(sqlx::Error::Protocol(
        "secret database credentials leaked".into(),
    ));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert!(!json.to_string().contains("secret"));
    assert_eq!(json["error"], "An internal error occurred");
}
