//! Transcript of one lead

use super::{attr, empty_message, render_view, text};
use crate::view::ViewState;
use botdash_core::types::{LeadDetail, Message, Role};

fn message(message: &Message) -> String {
    let role = match message.role {
        Role::User => "user",
        Role::Assistant => "assistant",
    };
    format!(
        r#"<li class="message {role}"><p class="bubble">{}</p><time class="muted small" datetime="{}">{}</time></li>"#,
        text(&message.content),
        message.created_at.to_rfc3339(),
        message.created_at.format("%H:%M")
    )
}

/// Transcript panel, or a prompt to pick a lead when nothing is selected
#[must_use]
pub fn lead_detail(view: &ViewState<LeadDetail>, retry_href: &str, close_href: &str) -> String {
    let body = render_view(
        view,
        retry_href,
        || super::loading::skeleton_rows(4),
        || empty_message("Select a lead to view the conversation"),
        |detail| {
            let conversation = &detail.conversation;
            let name = botdash_core::utils::display_name(conversation.user_id.as_deref(), conversation.id);
            let badge = if detail.is_unanswered {
                format!(
                    r#"<span class="badge warning">{} min unanswered</span>"#,
                    detail.unanswered_minutes.unwrap_or(0)
                )
            } else {
                String::new()
            };
            let messages: String = detail.messages.iter().map(message).collect();
            let transcript = if messages.is_empty() {
                empty_message("No messages")
            } else {
                format!(r#"<ol class="transcript">{messages}</ol>"#)
            };

            format!(
                r#"<header class="detail-head"><div><h3>{}</h3><p class="muted small">Started {}</p></div>{badge}<a class="close" href="{}" aria-label="Close">&times;</a></header>{transcript}"#,
                text(&name),
                conversation.created_at.format("%Y-%m-%d"),
                attr(close_href)
            )
        },
    );
    format!(r#"<aside class="lead-detail">{body}</aside>"#)
}
