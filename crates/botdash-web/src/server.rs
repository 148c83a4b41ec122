//! Router assembly

use crate::{api_client::ApiResult, routes, state::AppState};
use axum::Router;
use botdash_core::Config;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

/// Router over an existing state
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::page_routes())
        .merge(routes::health_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new()),
        )
}

/// Create the state for `config` and the router serving it
///
/// # Errors
///
/// Returns an error if the API client can not be created.
pub fn build_app(config: Config) -> ApiResult<Router> {
    let state = AppState::new(config)?;
    Ok(build_router(Arc::new(state)))
}
