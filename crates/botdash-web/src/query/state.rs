//! Point-in-time view of one cached query

use crate::api_client::ApiError;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// What a consumer sees of a query
#[derive(Debug)]
pub struct QueryState<T> {
    /// Last successful value; kept when a later fetch fails
    pub data: Option<Arc<T>>,
    /// Error of the most recent applied fetch
    pub error: Option<ApiError>,
    /// No value yet and a fetch is running
    pub is_loading: bool,
    /// A fetch is running, possibly in the background
    pub is_fetching: bool,
    /// When `data` was last replaced
    pub updated_at: Option<DateTime<Utc>>,
}

impl<T> QueryState<T> {
    /// State of a query that never fetched
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            data: None,
            error: None,
            is_loading: false,
            is_fetching: false,
            updated_at: None,
        }
    }

    /// Whether the last fetch succeeded and a value is present
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.data.is_some() && self.error.is_none()
    }
}

impl<T> Clone for QueryState<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            error: self.error.clone(),
            is_loading: self.is_loading,
            is_fetching: self.is_fetching,
            updated_at: self.updated_at,
        }
    }
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self::idle()
    }
}
