//! Cached, deduplicated, auto-refreshing queries
//!
//! A [`Query`] is what one consumer holds while it shows a resource. Mounting
//! it subscribes to the key, starts a fetch when the cache has nothing for the
//! key yet and keeps the key's refresh interval running until it is dropped.

pub mod cache;
pub mod key;
pub mod state;

pub use cache::{AnyValue, FetchResult, Fetcher, QueryCache, SharedFetch, Subscription};
pub use key::QueryKey;
pub use state::QueryState;

use std::{fmt, marker::PhantomData, time::Duration};
use tokio::sync::watch;
use tracing::debug;

struct Binding {
    key: QueryKey,
    fetcher: Fetcher,
    _subscription: Subscription,
}

/// A consumer's handle on one cached resource
pub struct Query<T> {
    cache: QueryCache,
    binding: Option<Binding>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Query<T>
where
    T: Send + Sync + 'static,
{
    /// Bind `key` and fetch it if the cache has nothing for it
    pub fn mount(
        cache: &QueryCache,
        key: QueryKey,
        fetcher: Fetcher,
        interval: Option<Duration>,
    ) -> Self {
        let subscription = cache.subscribe(&key, &fetcher, interval);
        if cache.fetch_if_needed(&key, &fetcher) {
            debug!("Mounted {} with a new fetch", key);
        }

        Self {
            cache: cache.clone(),
            binding: Some(Binding {
                key,
                fetcher,
                _subscription: subscription,
            }),
            _marker: PhantomData,
        }
    }

    /// A query that issues no requests and never has data
    #[must_use]
    pub fn disabled(cache: &QueryCache) -> Self {
        Self {
            cache: cache.clone(),
            binding: None,
            _marker: PhantomData,
        }
    }

    /// Whether this query is bound to a key
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.binding.is_some()
    }

    /// Bound key, if enabled
    #[must_use]
    pub fn key(&self) -> Option<&QueryKey> {
        self.binding.as_ref().map(|binding| &binding.key)
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> QueryState<T> {
        self.binding
            .as_ref()
            .map_or_else(QueryState::idle, |binding| self.cache.snapshot(&binding.key))
    }

    /// Wait until no fetch is running for the key, then return the state
    pub async fn settled(&self) -> QueryState<T> {
        if let Some(binding) = &self.binding {
            while let Some(pending) = self.cache.in_flight(&binding.key) {
                let _result = pending.await;
            }
        }
        self.state()
    }

    /// Fetch again even if a value is cached, and wait for it
    pub async fn refetch(&self) -> QueryState<T> {
        if let Some(binding) = &self.binding {
            let _result = self
                .cache
                .fetch(&binding.key, &binding.fetcher, true)
                .await;
        }
        self.state()
    }

    /// Change notifications for the bound key
    #[must_use]
    pub fn watch(&self) -> Option<watch::Receiver<u64>> {
        self.binding
            .as_ref()
            .map(|binding| self.cache.watch(&binding.key))
    }
}

impl<T> fmt::Debug for Query<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("key", &self.binding.as_ref().map(|binding| &binding.key))
            .finish_non_exhaustive()
    }
}
