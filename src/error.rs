//! Error types for the Essay Desk server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::correction::CorrectionError;
use crate::export::RenderError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Correction unavailable: {0}")]
    CorrectionUnavailable(#[from] CorrectionError),

    #[error("Failed to save essay: {0}")]
    SaveFailed(#[source] sqlx::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
///
/// Server-side failures carry only a generic message; the cause is logged.
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            AppError::CorrectionUnavailable(e) => {
                tracing::error!("Correction engine error: {}", e);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "correction_unavailable",
                    "The correction engine is not available right now.".to_string(),
                )
            }
            AppError::SaveFailed(e) => {
                tracing::error!("Error saving to database: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "persistence_error",
                    "Could not save essay to the database.".to_string(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "Database error".to_string(),
                )
            }
            AppError::Render(e) => {
                tracing::error!("PDF render error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "render_error",
                    "Could not generate the PDF document.".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
        });

        (status, body).into_response()
    }
}
