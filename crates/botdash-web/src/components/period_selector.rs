//! Link groups that switch a screen's filter

use super::{attr, text};
use botdash_core::types::{AlertThreshold, Period, SortField};

fn choices<T: Copy + PartialEq>(
    class: &str,
    options: impl IntoIterator<Item = T>,
    active: T,
    label: impl Fn(T) -> String,
    href: impl Fn(T) -> String,
) -> String {
    let links: String = options
        .into_iter()
        .map(|option| {
            let state = if option == active {
                r#" class="active" aria-current="true""#
            } else {
                ""
            };
            format!(
                r#"<a href="{}"{}>{}</a>"#,
                attr(&href(option)),
                state,
                text(&label(option))
            )
        })
        .collect();
    format!(r#"<nav class="selector {}">{}</nav>"#, attr(class), links)
}

/// Today / this week / this month
#[must_use]
pub fn period_selector(active: Period, href: impl Fn(Period) -> String) -> String {
    choices(
        "period-selector",
        Period::ALL,
        active,
        |period| period.label().to_string(),
        href,
    )
}

/// Alert threshold choices
#[must_use]
pub fn threshold_selector(active: AlertThreshold, href: impl Fn(AlertThreshold) -> String) -> String {
    choices(
        "threshold-selector",
        AlertThreshold::all(),
        active,
        AlertThreshold::label,
        href,
    )
}

/// Lead sort column choices
#[must_use]
pub fn sort_selector(active: SortField, href: impl Fn(SortField) -> String) -> String {
    choices(
        "sort-selector",
        SortField::ALL,
        active,
        |field| field.label().to_string(),
        href,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_selector_marks_active() {
        let html = period_selector(Period::Week, |period| format!("/?period={period}"));

        assert_eq!(html.matches("<a ").count(), 3);
        assert_eq!(html.matches(r#"class="active""#).count(), 1);
        assert!(html.contains(r#"<a href="/?period=week" class="active" aria-current="true">"#));
    }

    #[test]
    fn test_threshold_selector_lists_all_choices() {
        let html = threshold_selector(AlertThreshold::default(), |t| {
            format!("/alerts?minutes={}", t.minutes())
        });

        for minutes in AlertThreshold::CHOICES {
            assert!(html.contains(&format!("/alerts?minutes={minutes}\"")));
        }
        assert!(html.contains(r#"href="/alerts?minutes=15" class="active""#));
    }
}
