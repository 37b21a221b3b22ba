use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use crm_core::error::CoreError;
use crm_core::import::ImportError;
use crm_db::repositories::customer_repo::ACCOUNT_NUMBER_CONSTRAINT;
use crm_db::repositories::user_repo::EMAIL_CONSTRAINT;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] and [`ImportError`] and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `crm_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A fatal bulk-import error.
    #[error(transparent)]
    Import(#[from] ImportError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Internal(msg) => internal(msg),
            },

            // --- Import errors ---
            AppError::Import(err) => classify_import_error(err),

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => internal(msg),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Log the detail and return a sanitized 500.
fn internal(detail: &str) -> (StatusCode, &'static str, String) {
    tracing::error!(error = %detail, "Internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Classify a fatal import error. Client mistakes are 4xx with the error's
/// own message; a file that cannot be decoded is a sanitized 500.
fn classify_import_error(err: &ImportError) -> (StatusCode, &'static str, String) {
    let (status, code) = match err {
        ImportError::MissingInput => (StatusCode::BAD_REQUEST, "MISSING_FILE"),
        ImportError::UnsupportedFormat => (StatusCode::BAD_REQUEST, "UNSUPPORTED_FORMAT"),
        ImportError::PayloadTooLarge { .. } => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
        ImportError::EmptyFile => (StatusCode::BAD_REQUEST, "EMPTY_FILE"),
        ImportError::TooManyRows { .. } => (StatusCode::BAD_REQUEST, "TOO_MANY_ROWS"),
        ImportError::Decode(detail) => {
            tracing::error!(error = %detail, "Customer import failed to decode upload");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "IMPORT_FAILED",
                "Failed to import customers".to_string(),
            );
        }
    };
    (status, code, err.to_string())
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(crm_db::UNIQUE_VIOLATION) => {
            let constraint = db_err.constraint().unwrap_or("unknown");
            match constraint {
                ACCOUNT_NUMBER_CONSTRAINT => (
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    "Account number already exists".to_string(),
                ),
                EMAIL_CONSTRAINT => (
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    "User already exists".to_string(),
                ),
                c if c.starts_with("uq_") => (
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    format!("Duplicate value violates unique constraint: {c}"),
                ),
                _ => internal(&db_err.to_string()),
            }
        }
        other => internal(&other.to_string()),
    }
}

