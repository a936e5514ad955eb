use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use formflow_core::error::CoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce `{ "error": <class>, "message": <text> }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `formflow_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

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

/// The error classes a client can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Validation,
    Conflict,
    NotFound,
    Unauthorized,
    Internal,
}

impl ErrorClass {
    /// HTTP status and envelope label for each class.
    pub fn status_and_label(self) -> (StatusCode, &'static str) {
        match self {
            ErrorClass::Validation => (StatusCode::BAD_REQUEST, "Bad Request"),
            ErrorClass::Conflict => (StatusCode::BAD_REQUEST, "Conflict"),
            ErrorClass::NotFound => (StatusCode::NOT_FOUND, "Not Found"),
            ErrorClass::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            ErrorClass::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
        }
    }
}

const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl AppError {
    /// Classify this error and produce the client-facing message.
    ///
    /// Internal details are logged here and replaced with a generic message.
    pub fn classify(&self) -> (ErrorClass, String) {
        match self {
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => {
                    (ErrorClass::NotFound, format!("{entity} with id {id} not found"))
                }
                CoreError::Validation(msg) => (ErrorClass::Validation, msg.clone()),
                CoreError::Conflict(msg) => (ErrorClass::Conflict, msg.clone()),
                CoreError::Unauthorized(msg) => (ErrorClass::Unauthorized, msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (ErrorClass::Internal, INTERNAL_MESSAGE.to_string())
                }
            },
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::BadRequest(msg) => (ErrorClass::Validation, msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (ErrorClass::Internal, INTERNAL_MESSAGE.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (class, message) = self.classify();
        let (status, label) = class.status_and_label();

        let body = json!({
            "error": label,
            "message": message,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an error class and message.
///
/// - `RowNotFound` maps to NotFound.
/// - Unique violations (`23505`) on constraints named `uq_*` map to Conflict.
/// - Foreign key violations (`23503`) map to Validation: the request named a
///   row that does not exist (or no longer exists).
/// - Everything else maps to Internal with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (ErrorClass, String) {
    match err {
        sqlx::Error::RowNotFound => (ErrorClass::NotFound, "Resource not found".to_string()),
        sqlx::Error::Database(db_err) => {
            match db_err.code().as_deref() {
                Some("23505") => {
                    let constraint = db_err.constraint().unwrap_or("unknown");
                    if constraint.starts_with("uq_") {
                        return (
                            ErrorClass::Conflict,
                            format!("Duplicate value violates unique constraint: {constraint}"),
                        );
                    }
                }
                Some("23503") => {
                    return (
                        ErrorClass::Validation,
                        "Request references a resource that does not exist".to_string(),
                    );
                }
                _ => {}
            }
            tracing::error!(error = %db_err, "Database error");
            (ErrorClass::Internal, INTERNAL_MESSAGE.to_string())
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (ErrorClass::Internal, INTERNAL_MESSAGE.to_string())
        }
    }
}

/// Shorthand for the ownership-opaque not-found error.
pub fn not_found(entity: &'static str, id: formflow_core::types::DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity, id })
}
