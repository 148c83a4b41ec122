//! Application state shared by all handlers

use crate::{api_client::ApiResult, query::Query, resources::Resources};
use botdash_core::{
    Config,
    types::{AlertThreshold, TodaySummary, UnansweredAlertsResponse},
};
use std::sync::Arc;
use tracing::info;

/// Queries the server holds for its whole lifetime
#[derive(Debug)]
struct WarmQueries {
    _summary: Query<TodaySummary>,
    _alerts: Query<UnansweredAlertsResponse>,
}

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Config,
    /// Hooks over the process-wide cache
    pub resources: Resources,
    warm: Option<Arc<WarmQueries>>,
}

impl AppState {
    /// Create the state with a fresh cache
    ///
    /// With `live.keep_warm` the summary and dashboard alerts stay subscribed,
    /// so their interval refresh keeps running between page requests. Must be
    /// called inside a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the API client can not be created.
    pub fn new(config: Config) -> ApiResult<Self> {
        let resources = Resources::from_config(&config)?;
        let warm = config.live.keep_warm.then(|| {
            info!(
                "Keeping summary and {} minute alerts warm",
                config.dashboard.dashboard_alert_minutes
            );
            Arc::new(WarmQueries {
                _summary: resources.today_summary(),
                _alerts: resources.unanswered_alerts(config.dashboard.dashboard_alert_minutes),
            })
        });

        Ok(Self {
            config,
            resources,
            warm,
        })
    }

    /// Whether the warm subscriptions are held
    #[must_use]
    pub const fn is_warm(&self) -> bool {
        self.warm.is_some()
    }

    /// Threshold preselected on the alerts screen
    #[must_use]
    pub fn default_alert_threshold(&self) -> AlertThreshold {
        AlertThreshold::from_minutes(self.config.dashboard.alert_threshold_minutes)
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::query::QueryKey;
    use crate::api_client::endpoints;
    use pretty_assertions::assert_eq;

    fn config(keep_warm: bool) -> Config {
        let mut config = Config::default();
        // Nothing listens here; the warm fetches fail in the background.
        config.api.base_url = "http://127.0.0.1:9".to_string();
        config.live.keep_warm = keep_warm;
        config
    }

    #[tokio::test]
    async fn test_keep_warm_subscribes_summary_and_alerts() {
        let state = AppState::new(config(true)).unwrap();
        let cache = state.resources.cache();

        assert!(state.is_warm());
        assert_eq!(cache.subscriber_count(&QueryKey::from(&endpoints::today_summary())), 1);
        assert_eq!(
            cache.subscriber_count(&QueryKey::from(&endpoints::unanswered_alerts(30))),
            1
        );
    }

    #[tokio::test]
    async fn test_cold_state_holds_nothing() {
        let state = AppState::new(config(false)).unwrap();

        assert!(!state.is_warm());
        assert!(state.resources.cache().is_empty());
        assert_eq!(state.default_alert_threshold().minutes(), 15);
    }
}
