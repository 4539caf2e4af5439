//! Unified error handling for the LifeGuardian backend

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Credential rejected by the identity backend's strength policy.
    /// Distinct from `InvalidArgument` so callers can prompt for a stronger
    /// password, but surfaced under the same wire code.
    #[error("Weak password: {0}")]
    WeakPassword(String),

    #[error("Identity store error: {0}")]
    Identity(String),

    #[error("Document store error: {0}")]
    Firestore(String),

    #[error("Blob store error: {0}")]
    Storage(String),

    #[error("Email error: {0}")]
    Email(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Callable error body: a stable `code` plus a human-readable message
#[derive(Serialize)]
struct ErrorResponse {
    code: String,
    message: String,
}

impl AppError {
    /// Stable wire code for the callable surface
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidArgument(_) | AppError::WeakPassword(_) => "invalid-argument",
            AppError::NotFound(_) => "not-found",
            AppError::Identity(_)
            | AppError::Firestore(_)
            | AppError::Storage(_)
            | AppError::Email(_)
            | AppError::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::InvalidArgument(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::WeakPassword(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Identity(msg) => {
                tracing::error!("Identity store error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error updating password".to_string(),
                )
            }
            AppError::Firestore(msg) => {
                tracing::error!("Document store error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A backend error occurred".to_string(),
                )
            }
            AppError::Storage(msg) => {
                tracing::error!("Blob store error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A backend error occurred".to_string(),
                )
            }
            AppError::Email(msg) => {
                tracing::error!("Email error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error sending email".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: self.code().to_string(),
            message,
        });

        (status, body).into_response()
    }
}

// Conversion from validation errors
impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::InvalidArgument(errors.to_string())
    }
}
