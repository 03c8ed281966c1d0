use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use sqlx::error::ErrorKind;

use crate::model::validation::Violations;

/// The primary error type for the application.
///
/// Every handler returns [`AppResult`]; the variant decides the status code and
/// the JSON body sent to the client.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// One or more fields of a submitted resource failed validation.
    #[error("Validation failed: {0}")]
    Validation(Violations),
    /// For client errors due to malformed requests.
    #[error("Bad request: {0}")]
    BadRequest(String),
    /// For when a requested resource is not found.
    #[error("Not found: {0}")]
    NotFound(String),
    /// For when a request conflicts with stored relations.
    #[error("Conflict: {0}")]
    Conflict(String),
    /// For when a request is not authorized.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    /// For request bodies in a media type the endpoint does not accept.
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),
    /// For when a service is temporarily unavailable.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
    /// For errors related to database operations.
    #[error("Database error: {0}")]
    Database(String),
    /// For internal server errors that are not expected to be handled by the client.
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

fn reason(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Unknown")
}

fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

impl AppError {
    /// The HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let (code, message, details): (&str, String, Option<Value>) = match self {
            AppError::Validation(violations) => {
                let problems: Vec<String> = violations.iter().map(ToString::to_string).collect();
                tracing::debug!("Rejected resource with {} problem(s)", problems.len());
                let body = json!({
                    "timestamp": timestamp(),
                    "status": status.as_u16(),
                    "error": reason(status),
                    "problems": problems,
                });
                return (status, Json(body)).into_response();
            }
            AppError::BadRequest(msg) => ("BAD_REQUEST", msg, None),
            AppError::NotFound(msg) => ("NOT_FOUND", msg, None),
            AppError::Conflict(msg) => ("CONFLICT", msg, None),
            AppError::Unauthorized(msg) => ("UNAUTHORIZED", msg, None),
            AppError::UnsupportedMediaType(msg) => ("UNSUPPORTED_MEDIA_TYPE", msg, None),
            AppError::ServiceUnavailable(msg) => ("SERVICE_UNAVAILABLE", msg, None),
            AppError::Database(msg) => {
                tracing::error!("Database error: {}", msg);
                ("DATABASE_ERROR", "A database error occurred".to_string(), None)
            }
            AppError::Internal(e) => {
                let error_id = uuid::Uuid::new_v4();
                tracing::error!(error_id = %error_id, "Internal error: {:?}", e);
                (
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    Some(json!({ "error_id": error_id.to_string() })),
                )
            }
        };

        let mut body = json!({
            "timestamp": timestamp(),
            "status": status.as_u16(),
            "error": reason(status),
            "code": code,
            "message": message,
        });
        if let Some(details) = details {
            body["details"] = details;
        }

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".to_string()),
            sqlx::Error::Database(db_err) => match db_err.kind() {
                ErrorKind::UniqueViolation => {
                    AppError::Conflict(format!("Unique constraint violated: {}", db_err.message()))
                }
                ErrorKind::ForeignKeyViolation => AppError::Conflict(format!(
                    "Resource is still referenced or references a missing resource: {}",
                    db_err.message()
                )),
                ErrorKind::CheckViolation | ErrorKind::NotNullViolation => {
                    AppError::BadRequest(format!("Constraint violated: {}", db_err.message()))
                }
                _ => AppError::Database(db_err.message().to_string()),
            },
            sqlx::Error::PoolTimedOut => {
                AppError::ServiceUnavailable("Database connection pool timed out".to_string())
            }
            _ => AppError::Database(err.to_string()),
        }
    }
}

/// A type alias for `Result<T, AppError>`, used throughout the application.
pub type AppResult<T> = Result<T, AppError>;

/// An extension trait for `Option` that provides a convenient way to convert
/// an `Option` to a `Result` with a `NotFound` error.
pub trait OptionExt<T> {
    /// Converts `None` into `AppError::NotFound("<entity> not found")`.
    fn ok_or_not_found(self, entity: &str) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, entity: &str) -> AppResult<T> {
        self.ok_or_else(|| AppError::NotFound(format!("{} not found", entity)))
    }
}
