//! Server-rendered screens

use crate::{
    pages::{AlertsPage, AnalyticsPage, DashboardPage, LeadsPage, RawParams, SettleMode},
    state::AppState,
};
use axum::{
    extract::{Query, State},
    response::Html,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, instrument};

/// `GET /`
#[instrument(skip(state))]
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RawParams>,
) -> Html<String> {
    let page = DashboardPage::from_query(&params);
    let queries = page.mount(&state.resources, &state.config.dashboard);
    queries.settle(SettleMode::from_query(&params)).await;
    Html(queries.render(Utc::now()))
}

/// `GET /leads`
///
/// A page past the end of the list is rendered as the last page. The page is
/// clamped before mounting when the count for its sort is already cached.
#[instrument(skip(state))]
pub async fn leads(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RawParams>,
) -> Html<String> {
    let mode = SettleMode::from_query(&params);
    let config = &state.config.dashboard;

    let requested = LeadsPage::from_query(&params);
    let page = requested.clamped_to_cached(&state.resources, config.leads_page_size);
    if page != requested {
        debug!(
            "Page {} is past the cached count, showing page {}",
            requested.page, page.page
        );
    }

    let mut queries = page.mount(&state.resources, config);
    queries.settle(mode).await;
    if let Some(clamped) = queries.out_of_range() {
        debug!(
            "Page {} is out of range, showing page {}",
            queries.page().page,
            clamped.page
        );
        queries = clamped.mount(&state.resources, config);
        queries.settle(mode).await;
    }
    Html(queries.render(Utc::now()))
}

/// `GET /alerts`
#[instrument(skip(state))]
pub async fn alerts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RawParams>,
) -> Html<String> {
    let page = AlertsPage::from_query(&params, state.default_alert_threshold());
    let queries = page.mount(&state.resources);
    queries.settle(SettleMode::from_query(&params)).await;
    Html(queries.render(Utc::now()))
}

/// `GET /analytics`
#[instrument(skip(state))]
pub async fn analytics(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RawParams>,
) -> Html<String> {
    let page = AnalyticsPage::from_query(&params);
    let queries = page.mount(&state.resources, &state.config.dashboard);
    queries.settle(SettleMode::from_query(&params)).await;
    Html(queries.render(Utc::now()))
}
