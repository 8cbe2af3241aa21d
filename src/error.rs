use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// AppError
///
/// The single error type returned by every handler. Each variant maps to one HTTP status and
/// a client-facing message; nothing below the handler layer reaches the client unformatted.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or invalid required fields.
    #[error("{0}")]
    Validation(String),

    /// A unique key (slug, email, setting key) is already taken.
    #[error("{0}")]
    Conflict(String),

    #[error("Unauthorized: no active session")]
    NoSession,

    #[error("Unauthorized: admin role required")]
    NotAdmin,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("{0}")]
    NotFound(String),

    /// Unexpected store, storage or encoding failure. The detail is logged, never sent.
    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::NoSession | AppError::NotAdmin | AppError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Internal(detail) = &self {
            tracing::error!(error = %detail, "request failed");
        }

        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// StoreError
///
/// Failures raised by the repository layer. A unique-constraint violation is kept distinct
/// because the schema constraint, not the handler pre-check, is the authoritative conflict signal.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StoreError::UniqueViolation(db_err.constraint().unwrap_or("unknown").to_string())
            }
            _ => StoreError::Database(err.to_string()),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation(constraint) => {
                AppError::Conflict(format!("Duplicate value violates {constraint}"))
            }
            StoreError::Database(detail) => AppError::Internal(detail),
        }
    }
}

/// Maps a store-level unique violation onto the entity-specific conflict message.
pub trait ConflictExt<T> {
    fn on_conflict(self, message: &str) -> Result<T, AppError>;
}

impl<T> ConflictExt<T> for Result<T, StoreError> {
    fn on_conflict(self, message: &str) -> Result<T, AppError> {
        self.map_err(|err| match err {
            StoreError::UniqueViolation(_) => AppError::Conflict(message.to_string()),
            other => other.into(),
        })
    }
}

/// StorageError
///
/// Failure reported by the object storage backend.
#[derive(Debug, Error)]
#[error("storage error: {0}")]
pub struct StorageError(pub String);

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(format!("json column: {err}"))
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        AppError::Internal(format!("token signing: {err}"))
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(err: bcrypt::BcryptError) -> Self {
        AppError::Internal(format!("password hashing: {err}"))
    }
}
