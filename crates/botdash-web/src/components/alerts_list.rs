//! Leads waiting too long for an answer

use super::{attr, empty_message, render_view, text};
use crate::view::ViewState;
use botdash_core::{types::UnansweredAlertsResponse, utils::relative_time};
use chrono::{DateTime, Utc};

/// Alert rows, linked when `select_href` is given
#[must_use]
pub fn alerts_list(
    view: &ViewState<UnansweredAlertsResponse>,
    retry_href: &str,
    selected: Option<i64>,
    select_href: Option<&dyn Fn(i64) -> String>,
    now: DateTime<Utc>,
) -> String {
    render_view(
        view,
        retry_href,
        || super::loading::skeleton_rows(3),
        || {
            format!(
                r#"<div class="card all-clear"><h3>No unanswered inquiries</h3>{}</div>"#,
                empty_message("Every inquiry has been answered")
            )
        },
        |response| {
            let rows: String = response
                .alerts
                .iter()
                .map(|alert| {
                    let class = if selected == Some(alert.id) {
                        "alert-row selected"
                    } else {
                        "alert-row"
                    };
                    let inner = format!(
                        r#"<div class="row-head"><span class="name">{}</span><span class="badge warning">{} min</span></div><p class="muted clamp">{}</p><p class="muted small">{}</p>"#,
                        text(&alert.display_name()),
                        alert.unanswered_minutes,
                        text(&alert.last_question),
                        relative_time(alert.last_message_time, now)
                    );
                    match select_href {
                        Some(href) => format!(
                            r#"<li class="{class}"><a href="{}">{inner}</a></li>"#,
                            attr(&href(alert.id))
                        ),
                        None => format!(r#"<li class="{class}">{inner}</li>"#),
                    }
                })
                .collect();
            format!(r#"<ul class="alerts-list">{rows}</ul>"#)
        },
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::components::fixtures;
    use std::sync::Arc;

    fn alerts() -> UnansweredAlertsResponse {
        serde_json::from_value(serde_json::json!({
            "alerts": [
                {
                    "id": 9,
                    "user_id": null,
                    "last_question": "Why was I charged twice?",
                    "last_message_time": "2024-05-01T11:00:00",
                    "unanswered_minutes": 60
                },
                {
                    "id": 4,
                    "user_id": "kakao_4",
                    "last_question": "Is <b>5G</b> available?",
                    "last_message_time": "2024-05-01T11:40:00",
                    "unanswered_minutes": 20
                }
            ],
            "count": 2,
            "threshold_minutes": 15
        }))
        .unwrap()
    }

    #[test]
    fn test_alert_rows() {
        let view = ViewState::Ready(Arc::new(alerts()));
        let href = |id: i64| format!("/alerts?minutes=15&selected={id}");

        let html = alerts_list(&view, "/alerts?retry=1", Some(4), Some(&href), fixtures::now());

        assert!(html.contains("User #9"));
        assert!(html.contains("60 min"));
        assert!(html.contains("Is &lt;b&gt;5G&lt;/b&gt; available?"));
        assert!(html.contains(r#"href="/alerts?minutes=15&amp;selected=9""#));
        assert_eq!(html.matches("alert-row selected").count(), 1);
        assert!(html.contains("1 hour ago"));
    }

    #[test]
    fn test_rows_without_links() {
        let view = ViewState::Ready(Arc::new(alerts()));
        let html = alerts_list(&view, "/?retry=1", None, None, fixtures::now());
        assert!(!html.contains("<a "));
    }

    #[test]
    fn test_all_clear() {
        let html = alerts_list(&ViewState::Empty, "/?retry=1", None, None, fixtures::now());
        assert!(html.contains("No unanswered inquiries"));
    }
}
