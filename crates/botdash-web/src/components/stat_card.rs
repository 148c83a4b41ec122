//! Headline number cards

use super::{attr, loading::skeleton_block, render_view, text};
use crate::view::ViewState;
use botdash_core::{
    types::{DashboardStats, TodaySummary},
    utils::format_response_time,
};

/// Accent of a stat card
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CardVariant {
    /// Neutral
    #[default]
    Default,
    /// Highlighted
    Primary,
    /// Needs attention
    Warning,
}

impl CardVariant {
    const fn class(self) -> &'static str {
        match self {
            Self::Default => "stat-default",
            Self::Primary => "stat-primary",
            Self::Warning => "stat-warning",
        }
    }
}

/// One titled value; `None` renders a placeholder
#[must_use]
pub fn stat_card(title: &str, value: Option<&str>, variant: CardVariant) -> String {
    let value = value.map_or_else(
        || skeleton_block("stat-value"),
        |value| format!(r#"<p class="stat-value">{}</p>"#, text(value)),
    );
    format!(
        r#"<div class="card stat-card {}"><p class="stat-title">{}</p>{}</div>"#,
        attr(variant.class()),
        text(title),
        value
    )
}

/// The four headline cards of the dashboard
#[must_use]
pub fn summary_cards(view: &ViewState<TodaySummary>, retry_href: &str) -> String {
    let cards = |summary: Option<&TodaySummary>| {
        let value = |f: fn(&TodaySummary) -> String| summary.map(f);
        let unanswered = summary.map_or(0, |s| s.unanswered_count);
        let unanswered_variant = if unanswered > 0 {
            CardVariant::Warning
        } else {
            CardVariant::Default
        };
        [
            stat_card(
                "Inquiries today",
                value(|s| s.today_inquiries.to_string()).as_deref(),
                CardVariant::Primary,
            ),
            stat_card(
                "Inquiries this week",
                value(|s| s.week_inquiries.to_string()).as_deref(),
                CardVariant::Default,
            ),
            stat_card(
                "Avg. response time",
                value(|s| format_response_time(s.avg_response_time_seconds)).as_deref(),
                CardVariant::Default,
            ),
            stat_card(
                "Unanswered",
                value(|s| s.unanswered_count.to_string()).as_deref(),
                unanswered_variant,
            ),
        ]
        .concat()
    };

    let grid = |body: String| format!(r#"<div class="stat-grid">{body}</div>"#);
    render_view(
        view,
        retry_href,
        || grid(cards(None)),
        || grid(cards(None)),
        |summary| grid(cards(Some(summary))),
    )
}

/// Totals for the selected period
#[must_use]
pub fn period_summary(view: &ViewState<DashboardStats>, retry_href: &str) -> String {
    let body = render_view(
        view,
        retry_href,
        || [skeleton_block("summary-box"), skeleton_block("summary-box")].concat(),
        || super::empty_message("No data"),
        |stats| {
            format!(
                r#"<div class="summary-box primary"><p>Total inquiries</p><p class="summary-value">{}</p></div><div class="summary-box"><p>Avg. response time</p><p class="summary-value">{}</p></div>"#,
                stats.inquiries,
                text(&format_response_time(stats.avg_response_time_seconds))
            )
        },
    );
    super::card("period-summary", "Period summary", &body)
}
