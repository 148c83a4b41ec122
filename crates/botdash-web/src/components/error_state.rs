//! Error panel with a retry link

use super::{attr, text};
use crate::api_client::ApiError;

/// Render a failure
///
/// The retry link re-requests the page with `retry=1`, which refetches the
/// failed sections.
#[must_use]
pub fn error_state(error: &ApiError, retry_href: Option<&str>) -> String {
    let retry = retry_href.map_or_else(String::new, |href| {
        format!(
            r#"<a class="button retry" href="{}">Try again</a>"#,
            attr(href)
        )
    });
    format!(
        r#"<div class="card error-state" role="alert"><h3>Something went wrong</h3><p>There was a problem loading this data.</p><p class="error-detail">{}</p>{}</div>"#,
        text(&error.to_string()),
        retry
    )
}
