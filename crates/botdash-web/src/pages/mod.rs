//! Screens composed from resource hooks and components
//!
//! Page state lives in the URL. Each page parses its state from the raw query
//! parameters, mounts every query it depends on from that one snapshot and
//! renders once they have settled. Changing any parameter therefore re-keys all
//! dependent queries together.

pub mod alerts;
pub mod analytics;
pub mod dashboard;
pub mod leads;

pub use alerts::{AlertsPage, AlertsQueries};
pub use analytics::{AnalyticsPage, AnalyticsQueries};
pub use dashboard::{DashboardPage, DashboardQueries};
pub use leads::{LeadsPage, LeadsQueries};

use crate::query::Query;
use std::{collections::HashMap, str::FromStr};

/// Query parameters of a page request
pub type RawParams = HashMap<String, String>;

/// How a page treats queries that already have a cached result
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SettleMode {
    /// Use the cache, fetch only what is missing
    #[default]
    Cached,
    /// Fetch again every query whose last attempt failed
    RetryFailed,
    /// Fetch again every query on the page
    Refresh,
}

impl SettleMode {
    /// `refresh=1` wins over `retry=1`
    #[must_use]
    pub fn from_query(params: &RawParams) -> Self {
        if flag(params, "refresh") {
            Self::Refresh
        } else if flag(params, "retry") {
            Self::RetryFailed
        } else {
            Self::Cached
        }
    }
}

fn flag(params: &RawParams, name: &str) -> bool {
    params
        .get(name)
        .is_some_and(|value| matches!(value.as_str(), "1" | "true"))
}

/// Parse one parameter, `None` when absent or malformed
pub(crate) fn param<T: FromStr>(params: &RawParams, name: &str) -> Option<T> {
    params.get(name).and_then(|value| value.trim().parse().ok())
}

/// `path` with `pairs` as its query string
pub(crate) fn link(path: &str, pairs: &[(&str, String)]) -> String {
    if pairs.is_empty() {
        return path.to_string();
    }
    let query = serde_urlencoded::to_string(pairs).unwrap_or_default();
    format!("{path}?{query}")
}

/// Same page with the retry flag set
pub(crate) fn retry_link(path: &str, pairs: &[(&str, String)]) -> String {
    let mut pairs = pairs.to_vec();
    pairs.push(("retry", "1".to_string()));
    link(path, &pairs)
}

/// Wait for one query according to `mode`
pub(crate) async fn settle<T>(query: &Query<T>, mode: SettleMode)
where
    T: Send + Sync + 'static,
{
    let refetch = match mode {
        SettleMode::Cached => false,
        SettleMode::RetryFailed => query.settled().await.error.is_some(),
        SettleMode::Refresh => true,
    };
    if refetch {
        let _state = query.refetch().await;
    } else {
        let _state = query.settled().await;
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::RawParams;

    pub(crate) fn params(pairs: &[(&str, &str)]) -> RawParams {
        pairs
            .iter()
            .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
            .collect()
    }
}
