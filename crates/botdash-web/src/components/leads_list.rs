//! Paged lead list

use super::{attr, empty_message, render_view, text};
use crate::view::ViewState;
use botdash_core::{
    types::{Lead, LeadsResponse},
    utils::{relative_time, user_initials},
};
use chrono::{DateTime, Utc};

fn badges(lead: &Lead) -> String {
    let mut html = format!(r#"<span class="badge">{} questions</span>"#, lead.question_count);
    if lead.is_unanswered {
        html.push_str(&format!(
            r#"<span class="badge warning">{} min unanswered</span>"#,
            lead.unanswered_minutes.unwrap_or(0)
        ));
    } else if lead.answer_count > 0 {
        html.push_str(r#"<span class="badge success">Answered</span>"#);
    }
    html
}

fn row(lead: &Lead, selected: bool, href: &str, now: DateTime<Utc>) -> String {
    let class = if selected { "lead-row selected" } else { "lead-row" };
    let preview = lead.last_question.as_deref().unwrap_or("No messages");
    format!(
        r#"<li class="{class}"><a href="{}"><span class="avatar">{}</span><div class="lead-body"><div class="row-head"><span class="name">{}</span><span class="muted small">{}</span></div><p class="muted clamp">{}</p><div class="badges">{}</div></div></a></li>"#,
        attr(href),
        text(&user_initials(lead.user_id.as_deref())),
        text(&lead.display_name()),
        relative_time(lead.last_message_time, now),
        text(preview),
        badges(lead)
    )
}

/// Lead rows linking to their transcripts
#[must_use]
pub fn leads_list(
    view: &ViewState<LeadsResponse>,
    retry_href: &str,
    selected: Option<i64>,
    select_href: &dyn Fn(i64) -> String,
    now: DateTime<Utc>,
) -> String {
    render_view(
        view,
        retry_href,
        || super::loading::skeleton_rows(5),
        || empty_message("No leads"),
        |response| {
            let rows: String = response
                .leads
                .iter()
                .map(|lead| row(lead, selected == Some(lead.id), &select_href(lead.id), now))
                .collect();
            format!(r#"<ul class="leads-list">{rows}</ul>"#)
        },
    )
}
