//! Page navigation

use super::attr;

fn step(label: &str, target: Option<String>) -> String {
    match target {
        Some(href) => format!(r#"<a class="page-step" href="{}">{label}</a>"#, attr(&href)),
        None => format!(r#"<span class="page-step disabled" aria-disabled="true">{label}</span>"#),
    }
}

/// Total count, position and previous/next links
///
/// Previous is disabled on the first page and next on the last.
#[must_use]
pub fn pagination(page: u32, total_pages: u32, count: u64, href: &dyn Fn(u32) -> String) -> String {
    let prev = (page > 1).then(|| href(page - 1));
    let next = (page < total_pages).then(|| href(page + 1));
    format!(
        r#"<nav class="pagination"><span class="muted">Total {count}</span><div class="pager">{}<span class="position">{page} / {total_pages}</span>{}</div></nav>"#,
        step("Previous", prev),
        step("Next", next)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn href(page: u32) -> String {
        format!("/leads?page={page}&sort=created_at")
    }

    #[rstest]
    #[case(1, 3, false, true)]
    #[case(2, 3, true, true)]
    #[case(3, 3, true, false)]
    #[case(1, 1, false, false)]
    fn test_step_links(#[case] page: u32, #[case] total: u32, #[case] prev: bool, #[case] next: bool) {
        let html = pagination(page, total, 45, &href);

        assert_eq!(html.contains(&format!("page={}&amp;", page.wrapping_sub(1))), prev);
        assert_eq!(html.contains(&format!("page={}&amp;", page + 1)), next);
        assert!(html.contains(&format!("{page} / {total}")));
    }

    #[test]
    fn test_total_count() {
        let html = pagination(1, 3, 45, &href);
        assert!(html.contains("Total 45"));
        assert!(html.contains(r#"aria-disabled="true">Previous"#));
    }
}
