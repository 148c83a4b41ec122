//! Liveness endpoint

use crate::state::AppState;
use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Timestamp of the check
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Keys currently held by the query cache
    pub cache_entries: usize,
    /// Whether the warm subscriptions are held
    pub keep_warm: bool,
}

/// `GET /health`
///
/// Reports on this process only; the remote API is not contacted.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        cache_entries: state.resources.cache().len(),
        keep_warm: state.is_warm(),
    })
}
