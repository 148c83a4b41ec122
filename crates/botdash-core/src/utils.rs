//! Utility functions shared by the dashboard screens

use crate::types::TimeDistributionItem;
use chrono::{DateTime, Utc};

/// Lenient (de)serialization of server timestamps
///
/// The chatbot API emits ISO-8601 timestamps with or without a UTC offset.
/// Naive timestamps are taken to be UTC.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de};

    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    /// Parse a timestamp in any of the accepted layouts
    #[must_use]
    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NAIVE_FORMATS.iter().find_map(|format| {
                    NaiveDateTime::parse_from_str(raw, format)
                        .ok()
                        .map(|naive| naive.and_utc())
                })
            })
    }

    /// Serialize as RFC 3339
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339())
    }

    /// Deserialize from any accepted layout
    ///
    /// # Errors
    ///
    /// Fails when the value is not a string or not a recognizable timestamp.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp `{raw}`")))
    }
}

/// Expand a sparse per-hour breakdown to all 24 hours
///
/// Missing hours are zero, hours outside 0..=23 are ignored and for a repeated
/// hour the first entry wins.
#[must_use]
pub fn fill_time_distribution(items: &[TimeDistributionItem]) -> [u64; 24] {
    let mut hours = [0_u64; 24];
    let mut filled = [false; 24];
    for item in items {
        let Ok(hour) = usize::try_from(item.hour) else {
            continue;
        };
        if let (Some(slot), Some(done)) = (hours.get_mut(hour), filled.get_mut(hour))
            && !*done
        {
            *slot = item.count;
            *done = true;
        }
    }
    hours
}

/// Number of pages needed for `count` items, never less than one
#[must_use]
pub const fn total_pages(count: u64, page_size: u32) -> u32 {
    if page_size == 0 || count == 0 {
        return 1;
    }
    let pages = count.div_ceil(page_size as u64);
    if pages > u32::MAX as u64 {
        u32::MAX
    } else {
        pages as u32
    }
}

/// Clamp a requested page into `1..=total_pages`
#[must_use]
pub fn clamp_page(page: u32, total_pages: u32) -> u32 {
    page.clamp(1, total_pages.max(1))
}

/// Offset of the first item on a 1-based page
#[must_use]
pub const fn page_offset(page: u32, page_size: u32) -> u32 {
    page.saturating_sub(1).saturating_mul(page_size)
}

/// Format an average response time the way the stat cards show it
#[must_use]
pub fn format_response_time(seconds: f64) -> String {
    if seconds < 60.0 {
        format!("{:.0}s", seconds.round())
    } else {
        format!("{:.0}m", (seconds / 60.0).round())
    }
}

/// Up to two upper-cased characters identifying a user, `U` when unknown
#[must_use]
pub fn user_initials(user_id: Option<&str>) -> String {
    match user_id {
        Some(id) if !id.is_empty() => id.chars().take(2).collect::<String>().to_uppercase(),
        _ => "U".to_string(),
    }
}

/// User id when known, otherwise a numbered placeholder
#[must_use]
pub fn display_name(user_id: Option<&str>, id: i64) -> String {
    match user_id {
        Some(user) if !user.is_empty() => user.to_string(),
        _ => format!("User #{id}"),
    }
}

/// Coarse "time ago" text
#[must_use]
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - then).num_minutes();
    match minutes {
        i64::MIN..=0 => "just now".to_string(),
        1 => "1 minute ago".to_string(),
        2..=59 => format!("{minutes} minutes ago"),
        60..=119 => "1 hour ago".to_string(),
        120..=1439 => format!("{} hours ago", minutes / 60),
        1440..=2879 => "1 day ago".to_string(),
        _ => format!("{} days ago", minutes / 1440),
    }
}

/// Display label for a carrier code
#[must_use]
pub fn carrier_label(code: &str) -> &str {
    match code {
        "SK" => "SK Telecom",
        "LGU+" => "LG U+",
        other => other,
    }
}

/// Cut a label to `max_chars` characters, marking the cut with `...`
#[must_use]
pub fn truncate_label(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let mut cut: String = text.chars().take(max_chars).collect();
        cut.push_str("...");
        cut
    } else {
        text.to_string()
    }
}

/// Whole-number percentage of `part` in `total`
#[must_use]
pub fn share_percent(part: u64, total: u64) -> u64 {
    if total == 0 {
        0
    } else {
        part.saturating_mul(100) / total
    }
}
