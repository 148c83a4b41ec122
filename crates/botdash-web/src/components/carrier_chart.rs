//! Share of inquiries per mobile carrier

use super::{card, empty_message, loading::skeleton_block, render_view, text};
use crate::view::ViewState;
use botdash_core::{
    types::PopularCarriersResponse,
    utils::{carrier_label, share_percent},
};

/// Carrier breakdown with display labels and percentage shares
#[must_use]
pub fn carrier_chart(view: &ViewState<PopularCarriersResponse>, retry_href: &str) -> String {
    let body = render_view(
        view,
        retry_href,
        || skeleton_block("chart"),
        || empty_message("No data"),
        |response| {
            let total: u64 = response.carriers.iter().map(|c| c.count).sum();
            let rows: String = response
                .carriers
                .iter()
                .enumerate()
                .map(|(index, carrier)| {
                    let share = share_percent(carrier.count, total);
                    format!(
                        r#"<li class="share-row color-{}"><span class="share-label">{}</span><span class="share-bar" style="width: {share}%"></span><span class="share-value">{} ({share}%)</span></li>"#,
                        index % 5 + 1,
                        text(carrier_label(&carrier.carrier)),
                        carrier.count
                    )
                })
                .collect();
            format!(r#"<ul class="share-chart">{rows}</ul>"#)
        },
    );
    card("carrier-chart", "Inquiries by carrier", &body)
}
