//! Centralized error handling.
//!
//! Provides a unified error type for the entire application,
//! with automatic HTTP response conversion.
//!
//! Every service call is a single unit of work: an error aborts it, any open
//! transaction is rolled back, and the client receives
//! `{"error": {"code", "message"}}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Access denied")]
    Forbidden,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Resource not found")]
    NotFound,

    /// Names the entity that already exists, e.g. `Account`
    #[error("{0} already exists")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    BadRequest(String),

    #[error("Uploaded file exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    #[error("Authentication error")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Internal server error")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl AppError {
    /// HTTP status and machine-readable code for the client.
    fn classify(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
            AppError::Jwt(_) => (StatusCode::UNAUTHORIZED, "AUTH_ERROR"),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            AppError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            AppError::PayloadTooLarge { .. } => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE")
            }
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    /// Message shown to the client. Server-side details are logged instead.
    fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) | AppError::BadRequest(msg) => msg.clone(),
            AppError::Database(e) => {
                tracing::error!(error = ?e, "Database error");
                "A database error occurred".to_string()
            }
            AppError::Jwt(e) => {
                tracing::debug!(error = ?e, "Token rejected");
                "Invalid or expired token".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!(detail = %msg, "Internal error");
                "An internal error occurred".to_string()
            }
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.classify();
        let body = ErrorResponse {
            error: ErrorBody {
                code,
                message: self.user_message(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::NotFound)
    }
}

impl AppError {
    pub fn conflict(entity: impl Into<String>) -> Self {
        AppError::Conflict(entity.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    /// Map a write error: unique-constraint violations become `Conflict(entity)`
    /// and updates that touched no row become `NotFound`.
    pub fn from_write(err: DbErr, entity: &str) -> Self {
        if matches!(err, DbErr::RecordNotUpdated | DbErr::RecordNotFound(_)) {
            return AppError::NotFound;
        }
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                tracing::debug!(entity, detail = %detail, "Unique constraint violated");
                AppError::conflict(entity)
            }
            _ => AppError::Database(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::NotFound.classify().0, StatusCode::NOT_FOUND);
        assert_eq!(AppError::Forbidden.classify().0, StatusCode::FORBIDDEN);
        assert_eq!(AppError::conflict("Account").classify().0, StatusCode::CONFLICT);
        assert_eq!(
            AppError::InvalidCredentials.classify(),
            (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS")
        );
        assert_eq!(
            AppError::PayloadTooLarge { limit: 10 }.classify().0,
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }

    #[test]
    fn test_conflict_message_names_entity() {
        assert_eq!(
            AppError::conflict("Account").user_message(),
            "Account already exists"
        );
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let err = AppError::internal("disk on fire at /var/lib");
        assert_eq!(err.user_message(), "An internal error occurred");
        assert_eq!(err.classify().1, "INTERNAL_ERROR");
    }

    #[test]
    fn test_missing_row_on_update_is_not_found() {
        let err = AppError::from_write(DbErr::RecordNotUpdated, "Listing");
        assert!(matches!(err, AppError::NotFound));
    }

    #[test]
    fn test_non_unique_write_error_stays_database_error() {
        let err = AppError::from_write(DbErr::Custom("boom".to_string()), "Company");
        assert!(matches!(err, AppError::Database(_)));
    }
}
