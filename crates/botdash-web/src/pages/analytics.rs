//! Inquiry patterns over a reporting period

use super::{RawParams, SettleMode, link, param, retry_link, settle};
use crate::{
    components::{
        carrier_chart, models_chart, page_shell, period_selector, popular_questions_card,
        time_distribution_chart,
    },
    query::Query,
    resources::Resources,
    view::ViewState,
};
use botdash_core::{
    config::DashboardConfig,
    types::{
        Period, PopularCarriersResponse, PopularModelsResponse, PopularQuestionsResponse,
        TimeDistributionResponse,
    },
};
use chrono::{DateTime, Utc};

const PATH: &str = "/analytics";

/// State of the analytics screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalyticsPage {
    /// Reporting window shared by every chart
    pub period: Period,
}

impl AnalyticsPage {
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

    /// Same screen over another period
    #[must_use]
    pub const fn with_period(self, period: Period) -> Self {
        Self { period }
    }

    /// Mount every query of the screen
    #[must_use]
    pub fn mount(self, resources: &Resources, config: &DashboardConfig) -> AnalyticsQueries {
        AnalyticsQueries {
            page: self,
            distribution: resources.time_distribution(self.period),
            questions: resources.popular_questions(config.analytics_questions_limit),
            carriers: resources.popular_carriers(config.chart_limit, self.period),
            models: resources.popular_models(config.chart_limit, self.period),
        }
    }
}

/// Queries backing one render of the analytics screen
#[derive(Debug)]
pub struct AnalyticsQueries {
    page: AnalyticsPage,
    /// Inquiries per hour
    pub distribution: Query<TimeDistributionResponse>,
    /// Most asked questions
    pub questions: Query<PopularQuestionsResponse>,
    /// Inquiries per carrier
    pub carriers: Query<PopularCarriersResponse>,
    /// Inquiries per device model
    pub models: Query<PopularModelsResponse>,
}

impl AnalyticsQueries {
    /// Wait for every chart
    pub async fn settle(&self, mode: SettleMode) {
        futures::join!(
            settle(&self.distribution, mode),
            settle(&self.questions, mode),
            settle(&self.carriers, mode),
            settle(&self.models, mode),
        );
    }

    /// The whole document
    #[must_use]
    pub fn render(&self, now: DateTime<Utc>) -> String {
        let page = self.page;
        let retry = retry_link(PATH, &page.pairs());

        let periods = period_selector(page.period, |period| page.with_period(period).href());
        let distribution = time_distribution_chart(
            "Inquiries by hour",
            &ViewState::of(&self.distribution.state()),
            &retry,
            TimeDistributionResponse::hourly,
        );
        let carriers = carrier_chart(
            &ViewState::from_query(&self.carriers.state(), |response| {
                response.carriers.is_empty()
            }),
            &retry,
        );
        let models = models_chart(
            &ViewState::from_query(&self.models.state(), |response| response.models.is_empty()),
            &retry,
        );
        let questions = popular_questions_card(
            &ViewState::from_query(&self.questions.state(), |response| {
                response.questions.is_empty()
            }),
            &retry,
            now,
        );

        let body = format!(
            r#"<div class="toolbar"><p class="muted">Inquiry patterns and trends</p>{periods}</div>{distribution}<div class="split charts">{carriers}{models}</div>{questions}"#
        );
        page_shell("Analytics", PATH, &body)
    }
}
