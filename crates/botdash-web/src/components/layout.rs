//! Page shell with navigation

use super::{attr, text};

const NAV: [(&str, &str); 4] = [
    ("/", "Dashboard"),
    ("/leads", "Leads"),
    ("/analytics", "Analytics"),
    ("/alerts", "Alerts"),
];

const STYLE: &str = include_str!("../../assets/style.css");

/// Wrap a page body in the document and the sidebar
#[must_use]
pub fn page_shell(title: &str, active_path: &str, body: &str) -> String {
    let nav: String = NAV
        .iter()
        .map(|(path, label)| {
            let current = if *path == active_path {
                r#" class="active" aria-current="page""#
            } else {
                ""
            };
            format!(r#"<li><a href="{}"{current}>{label}</a></li>"#, attr(path))
        })
        .collect();

    format!(
        r#"<!DOCTYPE html><html lang="en"><head><meta charset="utf-8"><meta name="viewport" content="width=device-width, initial-scale=1"><title>{title} | Botdash</title><style>{STYLE}</style></head><body><aside class="sidebar"><h1 class="brand">Botdash</h1><nav><ul>{nav}</ul></nav></aside><main class="content"><h2 class="page-title">{title}</h2>{body}</main></body></html>"#,
        title = text(title)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_entry() {
        let html = page_shell("Leads", "/leads", "<p>body</p>");

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<a href="/leads" class="active" aria-current="page">Leads</a>"#));
        assert!(html.contains(r#"<a href="/">Dashboard</a>"#));
        assert_eq!(html.matches("aria-current").count(), 1);
        assert!(html.contains("<p>body</p>"));
    }

    #[test]
    fn test_title_is_escaped() {
        let html = page_shell("<Leads>", "/", "");
        assert!(html.contains("<title>&lt;Leads&gt; | Botdash</title>"));
    }
}
