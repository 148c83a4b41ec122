//! Most asked-about device models

use super::{attr, card, empty_message, loading::skeleton_block, render_view, text};
use crate::view::ViewState;
use botdash_core::{types::PopularModelsResponse, utils::truncate_label};

const MAX_MODELS: usize = 8;
const MAX_LABEL_CHARS: usize = 15;

/// Horizontal bars for the top models, longest names cut short
#[must_use]
pub fn models_chart(view: &ViewState<PopularModelsResponse>, retry_href: &str) -> String {
    let body = render_view(
        view,
        retry_href,
        || skeleton_block("chart"),
        || empty_message("No data"),
        |response| {
            let top = response.models.iter().take(MAX_MODELS);
            let max = top.clone().map(|m| m.count).max().unwrap_or(0);
            let rows: String = top
                .map(|model| {
                    let width = if max == 0 { 0 } else { model.count * 100 / max };
                    format!(
                        r#"<li class="hbar-row" title="{}"><span class="hbar-label">{}</span><span class="hbar" style="width: {width}%"></span><span class="hbar-value">{}</span></li>"#,
                        attr(&model.model),
                        text(&truncate_label(&model.model, MAX_LABEL_CHARS)),
                        model.count
                    )
                })
                .collect();
            format!(r#"<ul class="hbar-chart">{rows}</ul>"#)
        },
    );
    card("models-chart", "Popular models", &body)
}
