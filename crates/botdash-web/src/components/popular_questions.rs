//! Most frequent questions

use super::{card, empty_message, render_view, text};
use crate::view::ViewState;
use botdash_core::{types::PopularQuestionsResponse, utils::relative_time};
use chrono::{DateTime, Utc};

/// Question list with ask counts and when each was last asked
#[must_use]
pub fn popular_questions_card(
    view: &ViewState<PopularQuestionsResponse>,
    retry_href: &str,
    now: DateTime<Utc>,
) -> String {
    let body = render_view(
        view,
        retry_href,
        || super::loading::skeleton_rows(5),
        || empty_message("No data"),
        |response| {
            let items: String = response
                .questions
                .iter()
                .map(|question| {
                    format!(
                        r#"<li class="question"><p class="question-text">{}</p><span class="badge">{} times</span><p class="muted">Last asked {}</p></li>"#,
                        text(&question.question),
                        question.count,
                        relative_time(question.last_asked, now)
                    )
                })
                .collect();
            format!(r#"<ol class="question-list">{items}</ol>"#)
        },
    );
    card("popular-questions", "Popular questions", &body)
}
