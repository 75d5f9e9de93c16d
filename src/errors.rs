//! Centralized error handling.
//!
//! One error type for the whole application. Kinds are matched by variant,
//! and every variant knows its HTTP status and client-facing message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use thiserror::Error;

/// Message shared by every authentication failure.
const UNAUTHORIZED_MESSAGE: &str = "Authentication failed";

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token claims are malformed")]
    MalformedClaims,

    #[error("Invalid credentials")]
    InvalidCredentials,

    // Uniqueness conflicts
    #[error("Try using a different email.")]
    EmailExists,

    #[error("Service with same name exists.")]
    ServiceExists,

    #[error("Service with same version exists.")]
    VersionExists,

    // Resource errors
    #[error("Resource not found")]
    NotFound,

    #[error("Service not found")]
    ServiceNotFound,

    // Input
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unprocessable(String),

    // Infrastructure
    #[error("Database error")]
    Database(#[from] DbErr),

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
    code: String,
    message: String,
}

impl AppError {
    /// Get error code for client
    fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized
            | AppError::InvalidToken
            | AppError::MalformedClaims
            | AppError::InvalidCredentials => "UNAUTHORIZED",
            AppError::EmailExists => "EMAIL_EXISTS",
            AppError::ServiceExists => "SERVICE_EXISTS",
            AppError::VersionExists => "VERSION_EXISTS",
            AppError::NotFound | AppError::ServiceNotFound => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Unprocessable(_) => "UNPROCESSABLE_ENTITY",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized
            | AppError::InvalidToken
            | AppError::MalformedClaims
            | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::EmailExists
            | AppError::ServiceExists
            | AppError::VersionExists
            | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound | AppError::ServiceNotFound => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    fn user_message(&self) -> String {
        match self {
            AppError::Unauthorized
            | AppError::InvalidToken
            | AppError::MalformedClaims
            | AppError::InvalidCredentials => UNAUTHORIZED_MESSAGE.to_string(),

            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            _ => self.to_string(),
        }
    }

    /// Translate a unique-index violation into the given conflict kind.
    ///
    /// Any other database failure is kept as `Database`.
    pub fn on_unique_violation(err: DbErr, conflict: AppError) -> AppError {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                tracing::debug!("Unique constraint violated: {}", detail);
                conflict
            }
            _ => AppError::Database(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code().to_string(),
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

/// Convenience constructors
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn unprocessable(msg: impl Into<String>) -> Self {
        AppError::Unprocessable(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
