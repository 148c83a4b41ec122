//! Unanswered leads over a selectable threshold

use super::{RawParams, SettleMode, link, param, retry_link, settle};
use crate::{
    components::{alerts_list, lead_detail, page_shell, text, threshold_selector},
    query::Query,
    resources::Resources,
    view::ViewState,
};
use botdash_core::types::{AlertThreshold, LeadDetail, UnansweredAlertsResponse};
use chrono::{DateTime, Utc};

const PATH: &str = "/alerts";

/// State of the alerts screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlertsPage {
    /// Minimum waiting time listed
    pub threshold: AlertThreshold,
    /// Alert whose transcript is open
    pub selected: Option<i64>,
}

impl AlertsPage {
    /// Parse from the request, falling back to `default_threshold` for
    /// thresholds the selector does not offer
    #[must_use]
    pub fn from_query(params: &RawParams, default_threshold: AlertThreshold) -> Self {
        Self {
            threshold: param(params, "minutes").unwrap_or(default_threshold),
            selected: param(params, "selected"),
        }
    }

    fn pairs(self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("minutes", self.threshold.minutes().to_string())];
        if let Some(id) = self.selected {
            pairs.push(("selected", id.to_string()));
        }
        pairs
    }

    /// Link to this state
    #[must_use]
    pub fn href(self) -> String {
        link(PATH, &self.pairs())
    }

    /// Change the threshold, closing any open transcript
    #[must_use]
    pub const fn with_threshold(self, threshold: AlertThreshold) -> Self {
        Self {
            threshold,
            selected: None,
        }
    }

    /// Open the transcript of `id`
    #[must_use]
    pub const fn select(self, id: i64) -> Self {
        Self {
            selected: Some(id),
            ..self
        }
    }

    /// Close the transcript
    #[must_use]
    pub const fn close(self) -> Self {
        Self {
            selected: None,
            ..self
        }
    }

    /// Mount every query of the screen
    #[must_use]
    pub fn mount(self, resources: &Resources) -> AlertsQueries {
        AlertsQueries {
            page: self,
            alerts: resources.unanswered_alerts(self.threshold.minutes()),
            detail: resources.lead_detail(self.selected),
        }
    }
}

/// Queries backing one render of the alerts screen
#[derive(Debug)]
pub struct AlertsQueries {
    page: AlertsPage,
    /// Leads over the threshold
    pub alerts: Query<UnansweredAlertsResponse>,
    /// Transcript of the selected alert
    pub detail: Query<LeadDetail>,
}

impl AlertsQueries {
    /// Wait for the list and the transcript
    pub async fn settle(&self, mode: SettleMode) {
        futures::join!(settle(&self.alerts, mode), settle(&self.detail, mode));
    }

    /// The whole document
    #[must_use]
    pub fn render(&self, now: DateTime<Utc>) -> String {
        let page = self.page;
        let pairs = page.pairs();
        let retry = retry_link(PATH, &pairs);
        let mut refresh_pairs = pairs;
        refresh_pairs.push(("refresh", "1".to_string()));

        let alerts_state = self.alerts.state();
        let count = if alerts_state.is_loading {
            "-".to_string()
        } else {
            alerts_state
                .data
                .as_ref()
                .map_or(0, |response| response.count)
                .to_string()
        };
        let overview = format!(
            r#"<div class="card alert-summary"><p>Unanswered for {}+ min</p><p class="stat-value warning">{}</p><a class="button" href="{}">Refresh</a></div>"#,
            page.threshold.minutes(),
            text(&count),
            link(PATH, &refresh_pairs)
        );

        let thresholds = threshold_selector(page.threshold, |threshold| {
            page.with_threshold(threshold).href()
        });
        let select = |id: i64| page.select(id).href();
        let list = alerts_list(
            &ViewState::from_query(&alerts_state, |response| response.alerts.is_empty()),
            &retry,
            page.selected,
            Some(&select),
            now,
        );
        let detail = lead_detail(
            &ViewState::of(&self.detail.state()),
            &retry,
            &page.close().href(),
        );

        let body = format!(
            r#"<div class="toolbar"><p class="muted">Unanswered threshold</p>{thresholds}</div>{overview}<div class="split alerts"><div class="card list-panel">{list}</div>{detail}</div>"#
        );
        page_shell("Alerts", PATH, &body)
    }
}
