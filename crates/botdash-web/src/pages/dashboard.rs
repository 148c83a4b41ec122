//! Main dashboard: today's numbers, period statistics and open alerts

use super::{RawParams, SettleMode, link, param, retry_link, settle};
use crate::{
    components::{
        alerts_list, card, page_shell, period_selector, period_summary, popular_questions_card,
        summary_cards, time_distribution_chart,
    },
    query::Query,
    resources::Resources,
    view::ViewState,
};
use botdash_core::{
    config::DashboardConfig,
    types::{
        DashboardStats, Period, PopularQuestionsResponse, TodaySummary, UnansweredAlertsResponse,
    },
};
use chrono::{DateTime, Utc};

const PATH: &str = "/";

/// State of the dashboard screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardPage {
    /// Window of the statistics section
    pub period: Period,
}

impl DashboardPage {
    /// Parse from the request, unknown periods fall back to today
    #[must_use]
    pub fn from_query(params: &RawParams) -> Self {
        Self {
            period: param(params, "period").unwrap_or_default(),
        }
    }

    fn pairs(self) -> Vec<(&'static str, String)> {
        vec![("period", self.period.as_str().to_string())]
    }

    /// Link to this state
    #[must_use]
    pub fn href(self) -> String {
        link(PATH, &self.pairs())
    }

    /// Same screen with another statistics period
    #[must_use]
    pub const fn with_period(self, period: Period) -> Self {
        Self { period }
    }

    /// Mount every query of the screen
    #[must_use]
    pub fn mount(self, resources: &Resources, config: &DashboardConfig) -> DashboardQueries {
        DashboardQueries {
            page: self,
            alert_minutes: config.dashboard_alert_minutes,
            summary: resources.today_summary(),
            stats: resources.stats(self.period),
            questions: resources.popular_questions(config.dashboard_questions_limit),
            alerts: resources.unanswered_alerts(config.dashboard_alert_minutes),
        }
    }
}

/// Queries backing one render of the dashboard
#[derive(Debug)]
pub struct DashboardQueries {
    page: DashboardPage,
    alert_minutes: u32,
    /// Today's summary
    pub summary: Query<TodaySummary>,
    /// Statistics for the selected period
    pub stats: Query<DashboardStats>,
    /// Most asked questions
    pub questions: Query<PopularQuestionsResponse>,
    /// Leads over the dashboard alert threshold
    pub alerts: Query<UnansweredAlertsResponse>,
}

impl DashboardQueries {
    /// Wait for every section
    pub async fn settle(&self, mode: SettleMode) {
        futures::join!(
            settle(&self.summary, mode),
            settle(&self.stats, mode),
            settle(&self.questions, mode),
            settle(&self.alerts, mode),
        );
    }

    /// The whole document
    #[must_use]
    pub fn render(&self, now: DateTime<Utc>) -> String {
        let page = self.page;
        let retry = retry_link(PATH, &page.pairs());

        let summary = summary_cards(&ViewState::of(&self.summary.state()), &retry);

        let stats = ViewState::of(&self.stats.state());
        let periods = period_selector(page.period, |period| page.with_period(period).href());
        let chart = time_distribution_chart(
            "Inquiries by hour",
            &stats,
            &retry,
            DashboardStats::hourly,
        );
        let totals = period_summary(&stats, &retry);

        let questions = popular_questions_card(
            &ViewState::from_query(&self.questions.state(), |response| {
                response.questions.is_empty()
            }),
            &retry,
            now,
        );
        let alerts = alerts_list(
            &ViewState::from_query(&self.alerts.state(), |response| response.alerts.is_empty()),
            &retry,
            None,
            None,
            now,
        );
        let alerts_link = format!(
            r#"<a class="button" href="{}">View all</a>"#,
            link("/alerts", &[("minutes", self.alert_minutes.to_string())])
        );
        let alerts = card(
            "dashboard-alerts",
            &format!("Unanswered for {}+ min", self.alert_minutes),
            &[alerts, alerts_link].concat(),
        );

        let body = format!(
            r#"<div class="grid summary">{summary}</div><div class="toolbar"><h3>Statistics by period</h3>{periods}</div><div class="split stats">{chart}{totals}</div><div class="split bottom">{questions}{alerts}</div>"#
        );
        page_shell("Dashboard", PATH, &body)
    }
}
