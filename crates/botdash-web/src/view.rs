//! Render state derived from a query
//!
//! Every screen section picks exactly one of these before rendering, so the
//! loading, empty and error branches are decided in one place.

use crate::{api_client::ApiError, query::QueryState};
use std::sync::Arc;

/// Which of the section renders applies
#[derive(Debug)]
pub enum ViewState<T> {
    /// Nothing to show yet, a fetch is running
    Loading,
    /// Fetched, but there is nothing to list
    Empty,
    /// Content to show
    Ready(Arc<T>),
    /// The last fetch failed
    Failed {
        /// The failure to report
        error: ApiError,
        /// Last good value, if any, shown behind the retry affordance
        stale: Option<Arc<T>>,
    },
}

impl<T> ViewState<T> {
    /// Decide the render for `state`
    ///
    /// An error takes precedence over any value. A value for which `is_empty`
    /// holds renders as [`ViewState::Empty`], as does a query that has no value
    /// and is not fetching.
    pub fn from_query(state: &QueryState<T>, is_empty: impl FnOnce(&T) -> bool) -> Self {
        if let Some(error) = &state.error {
            return Self::Failed {
                error: error.clone(),
                stale: state.data.clone(),
            };
        }

        match &state.data {
            Some(data) if is_empty(data) => Self::Empty,
            Some(data) => Self::Ready(Arc::clone(data)),
            None if state.is_loading => Self::Loading,
            None => Self::Empty,
        }
    }

    /// Same as [`ViewState::from_query`] for values that are never empty
    #[must_use]
    pub fn of(state: &QueryState<T>) -> Self {
        Self::from_query(state, |_| false)
    }

    /// The value to render, current or stale
    #[must_use]
    pub const fn data(&self) -> Option<&Arc<T>> {
        match self {
            Self::Ready(data) | Self::Failed { stale: Some(data), .. } => Some(data),
            _ => None,
        }
    }

    /// Whether the skeleton applies
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

impl<T> Clone for ViewState<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Loading => Self::Loading,
            Self::Empty => Self::Empty,
            Self::Ready(data) => Self::Ready(Arc::clone(data)),
            Self::Failed { error, stale } => Self::Failed {
                error: error.clone(),
                stale: stale.clone(),
            },
        }
    }
}
