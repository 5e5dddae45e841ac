//! Route modules for Essay Desk

pub mod analyze;
pub mod download;
pub mod health;
pub mod history;
pub mod submit;

use axum::{
    routing::{get, post},
    Router,
};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(submit::index).post(submit::check))
        .route("/save", post(submit::save))
        .route("/analyze/:id", get(analyze::analyze_essay))
        .route("/history", get(history::history))
        .route("/download/:id", get(download::download_pdf))
        .route("/health", get(health::health_check))
        .with_state(state)
}

/// Essay ids in paths are integers; anything else names no essay
pub(crate) fn parse_essay_id(raw: &str) -> Result<i64> {
    raw.parse::<i64>()
        .map_err(|_| AppError::NotFound(format!("Essay not found: {}", raw)))
}
