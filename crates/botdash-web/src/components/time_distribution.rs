//! Inquiries per hour of day as 24 bars

use super::{card, loading::skeleton_block, render_view};
use crate::view::ViewState;

fn bars(hours: &[u64; 24]) -> String {
    let max = hours.iter().copied().max().unwrap_or(0);
    let bars: String = hours
        .iter()
        .enumerate()
        .map(|(hour, &count)| {
            let height = if max == 0 { 0 } else { count * 100 / max };
            let label = if hour % 3 == 0 {
                format!("{hour}h")
            } else {
                String::new()
            };
            format!(
                r#"<div class="bar-column" title="{hour}:00 - {count} inquiries"><div class="bar" style="height: {height}%"></div><span class="bar-label">{label}</span></div>"#
            )
        })
        .collect();
    format!(r#"<div class="bar-chart hours">{bars}</div>"#)
}

/// Chart of `hourly(value)`, always all 24 hours
#[must_use]
pub fn time_distribution_chart<T>(
    title: &str,
    view: &ViewState<T>,
    retry_href: &str,
    hourly: impl FnOnce(&T) -> [u64; 24],
) -> String {
    let body = render_view(
        view,
        retry_href,
        || skeleton_block("chart"),
        || bars(&[0; 24]),
        |value| bars(&hourly(value)),
    );
    card("time-distribution", title, &body)
}
