//! Reusable HTML components
//!
//! Every component is a pure function of its arguments. None of them fetch;
//! pages hand them finished [`ViewState`]s. All text coming from the API or
//! the request is escaped here.

pub mod alerts_list;
pub mod carrier_chart;
pub mod error_state;
pub mod layout;
pub mod lead_detail;
pub mod leads_list;
pub mod loading;
pub mod models_chart;
pub mod pagination;
pub mod period_selector;
pub mod popular_questions;
pub mod stat_card;
pub mod time_distribution;

pub use alerts_list::alerts_list;
pub use carrier_chart::carrier_chart;
pub use error_state::error_state;
pub use layout::page_shell;
pub use lead_detail::lead_detail;
pub use leads_list::leads_list;
pub use models_chart::models_chart;
pub use pagination::pagination;
pub use period_selector::{period_selector, sort_selector, threshold_selector};
pub use popular_questions::popular_questions_card;
pub use stat_card::{CardVariant, period_summary, stat_card, summary_cards};
pub use time_distribution::time_distribution_chart;

use crate::view::ViewState;
use std::borrow::Cow;

/// Escape text content
pub(crate) fn text(value: &str) -> Cow<'_, str> {
    html_escape::encode_text(value)
}

/// Escape a double-quoted attribute value
pub(crate) fn attr(value: &str) -> Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(value)
}

/// Pick the render for a section
///
/// A failure shows the error with its retry link, followed by the last good
/// content when there is one.
pub(crate) fn render_view<T>(
    view: &ViewState<T>,
    retry_href: &str,
    skeleton: impl FnOnce() -> String,
    empty: impl FnOnce() -> String,
    content: impl FnOnce(&T) -> String,
) -> String {
    match view {
        ViewState::Loading => skeleton(),
        ViewState::Empty => empty(),
        ViewState::Ready(data) => content(data),
        ViewState::Failed { error, stale } => {
            let mut html = error_state(error, Some(retry_href));
            if let Some(data) = stale {
                html.push_str(&content(data));
            }
            html
        }
    }
}

/// A titled card around `body`
pub(crate) fn card(class: &str, title: &str, body: &str) -> String {
    format!(
        r#"<section class="card {}"><h3 class="card-title">{}</h3>{}</section>"#,
        attr(class),
        text(title),
        body
    )
}

/// Empty-state message
pub(crate) fn empty_message(message: &str) -> String {
    format!(r#"<p class="empty">{}</p>"#, text(message))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod fixtures {
    use botdash_core::{
        types::{LeadsResponse, PopularQuestionsResponse},
        utils::timestamp,
    };
    use chrono::{DateTime, Utc};

    pub(crate) fn now() -> DateTime<Utc> {
        timestamp::parse("2024-05-01T12:00:00Z").unwrap()
    }

    pub(crate) fn leads() -> LeadsResponse {
        serde_json::from_value(serde_json::json!({
            "leads": [
                {
                    "id": 1,
                    "user_id": "kakao_<b>",
                    "created_at": "2024-05-01T09:00:00",
                    "updated_at": "2024-05-01T11:30:00",
                    "last_question": "Can I switch to eSIM?",
                    "last_answer": null,
                    "last_message_time": "2024-05-01T11:35:00",
                    "question_count": 3,
                    "answer_count": 2,
                    "is_unanswered": true,
                    "unanswered_minutes": 25
                },
                {
                    "id": 2,
                    "user_id": null,
                    "created_at": "2024-05-01T08:00:00",
                    "updated_at": "2024-05-01T08:10:00",
                    "last_question": null,
                    "last_answer": "You're welcome!",
                    "last_message_time": "2024-05-01T08:10:00",
                    "question_count": 1,
                    "answer_count": 1,
                    "is_unanswered": false,
                    "unanswered_minutes": null
                }
            ],
            "count": 45,
            "limit": 20,
            "offset": 0
        }))
        .unwrap()
    }

    pub(crate) fn questions() -> PopularQuestionsResponse {
        serde_json::from_value(serde_json::json!({
            "questions": [
                { "question": "When does my plan renew?", "count": 12, "last_asked": "2024-05-01T11:00:00" },
                { "question": "How do I port my number?", "count": 4, "last_asked": "2024-04-29T12:00:00Z" }
            ]
        }))
        .unwrap()
    }
}
