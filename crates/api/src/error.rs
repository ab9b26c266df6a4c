use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cradle_core::error::CoreError;
use cradle_core::messages::{guest_message, Locale};
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `cradle_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A domain error raised on a guest-facing route. Same status and code
    /// as [`AppError::Core`], with a localized message.
    #[error("{source}")]
    Guest { source: CoreError, locale: Locale },

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Re-tag a domain error for a guest, keeping other variants as-is.
    pub fn for_guest(self, locale: Locale) -> Self {
        match self {
            AppError::Core(source) => AppError::Guest { source, locale },
            other => other,
        }
    }
}

const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => {
                let (status, code) = classify_core_error(core);
                (status, code, owner_message(core))
            }
            AppError::Guest { source, locale } => {
                let (status, code) = classify_core_error(source);
                let mut body = json!({
                    "error": guest_message(source, *locale),
                    "code": code,
                });
                if let CoreError::InsufficientRemaining { remaining, .. } = source {
                    body["remaining"] = json!(remaining);
                }
                if source.is_retryable() {
                    body["retryable"] = json!(true);
                }
                return (status, axum::Json(body)).into_response();
            }

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let AppError::Core(CoreError::InsufficientRemaining { remaining, .. }) = &self {
            body["remaining"] = json!(remaining);
        }

        (status, axum::Json(body)).into_response()
    }
}

/// HTTP status and machine-readable code for a domain error.
fn classify_core_error(err: &CoreError) -> (StatusCode, &'static str) {
    match err {
        CoreError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        CoreError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        CoreError::AlreadyFulfilled { .. } => (StatusCode::CONFLICT, "ALREADY_FULFILLED"),
        CoreError::InsufficientRemaining { .. } => {
            (StatusCode::CONFLICT, "INSUFFICIENT_REMAINING")
        }
        CoreError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
        CoreError::StoreUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "STORE_UNAVAILABLE"),
    }
}

/// Owner-facing message for a domain error. Store details are logged, never
/// returned.
fn owner_message(err: &CoreError) -> String {
    match err {
        CoreError::NotFound { entity, id } => format!("{entity} with id {id} not found"),
        CoreError::Validation(msg) | CoreError::Conflict(msg) => msg.clone(),
        CoreError::AlreadyFulfilled { .. } | CoreError::InsufficientRemaining { .. } => {
            err.to_string()
        }
        CoreError::StoreUnavailable(msg) => {
            tracing::warn!(error = %msg, "Store unavailable");
            "The registry is temporarily unavailable, please retry".to_string()
        }
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Check constraint violations (constraint name starting with `ck_`) map to 409.
/// - Pool exhaustion and I/O failures map to 503.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            let constraint = db_err.constraint().unwrap_or("unknown");
            match db_err.code().as_deref() {
                // PostgreSQL unique constraint violation.
                Some("23505") if constraint.starts_with("uq_") => {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
                // PostgreSQL check constraint violation.
                Some("23514") if constraint.starts_with("ck_") => {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Value violates check constraint: {constraint}"),
                    );
                }
                _ => {}
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                INTERNAL_MESSAGE.to_string(),
            )
        }
        sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => {
            tracing::warn!(error = %err, "Database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "STORE_UNAVAILABLE",
                "The registry is temporarily unavailable, please retry".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                INTERNAL_MESSAGE.to_string(),
            )
        }
    }
}
