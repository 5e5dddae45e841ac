//! Essay Desk Server Library
//!
//! Accepts essay text, corrects it with a configurable engine, stores the
//! original and corrected text with writing statistics, and serves history,
//! spelling analysis and PDF export.
//!
//! The server binary is in main.rs.
//!
//! # Modules
//!
//! - `correction`: swappable correction engines behind one service
//! - `spelling`: dictionary spell checker and tokenizer
//! - `db`, `store`, `history`: essay persistence and time-windowed queries
//! - `export`: HTML layout and PDF rendering
//! - `routes`: HTTP handlers

pub mod config;
pub mod correction;
pub mod db;
pub mod error;
pub mod export;
pub mod history;
pub mod routes;
pub mod spelling;
pub mod state;
pub mod store;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Router with tracing and CORS layers applied
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
