//! Skeleton placeholders shown while a section has nothing to display yet

/// `rows` placeholder list rows
#[must_use]
pub fn skeleton_rows(rows: usize) -> String {
    let rows: String = (0..rows)
        .map(|_| {
            r#"<div class="skeleton-row"><div class="skeleton avatar"></div><div class="skeleton-lines"><div class="skeleton line short"></div><div class="skeleton line"></div></div></div>"#
        })
        .collect();
    format!(r#"<div class="skeleton-list" aria-busy="true">{rows}</div>"#)
}

/// Placeholder for a chart or a single value
#[must_use]
pub fn skeleton_block(class: &str) -> String {
    format!(
        r#"<div class="skeleton {}" aria-busy="true"></div>"#,
        super::attr(class)
    )
}
