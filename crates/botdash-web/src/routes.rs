//! Route definitions

use crate::{handlers, state::AppState};
use axum::{Router, routing::get};
use std::sync::Arc;

/// The four dashboard screens
pub fn page_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::pages::dashboard))
        .route("/leads", get(handlers::pages::leads))
        .route("/alerts", get(handlers::pages::alerts))
        .route("/analytics", get(handlers::pages::analytics))
}

/// Health check routes
pub fn health_routes() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(handlers::health::health_check))
}
