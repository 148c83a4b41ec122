//! Process-wide query cache
//!
//! One entry per [`QueryKey`]. Concurrent fetches of a key share a single
//! in-flight request. Every started fetch is stamped with a sequence number
//! and a result is only applied when it is newer than the last one applied to
//! its entry, so a slow early response can never replace a later one.
//!
//! An entry nobody subscribes to and nothing is fetching is evicted once it
//! has been unused for the retention window.

use super::{key::QueryKey, state::QueryState};
use crate::api_client::ApiError;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::{
    any::Any,
    fmt,
    panic::AssertUnwindSafe,
    sync::{
        Arc, Weak,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, warn};

/// Type-erased cached value
pub type AnyValue = Arc<dyn Any + Send + Sync>;

/// Outcome of one fetch
pub type FetchResult = Result<AnyValue, ApiError>;

/// Future every caller of one in-flight fetch awaits
pub type SharedFetch = Shared<BoxFuture<'static, FetchResult>>;

/// Starts one request for a key
pub type Fetcher = Arc<dyn Fn() -> BoxFuture<'static, FetchResult> + Send + Sync>;

/// How long an unused entry is kept by [`QueryCache::new`]
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(300);

struct InFlight {
    seq: u64,
    future: SharedFetch,
}

struct Entry {
    data: Option<AnyValue>,
    error: Option<ApiError>,
    updated_at: Option<DateTime<Utc>>,
    in_flight: Option<InFlight>,
    applied_seq: u64,
    data_seq: u64,
    subscribers: usize,
    refresh_task: Option<JoinHandle<()>>,
    interval: Option<Duration>,
    settled_at: Option<time::Instant>,
    last_used: time::Instant,
    fetcher: Option<Fetcher>,
    version: watch::Sender<u64>,
}

impl Entry {
    fn new() -> Self {
        let (version, _) = watch::channel(0);
        Self {
            data: None,
            error: None,
            updated_at: None,
            in_flight: None,
            applied_seq: 0,
            data_seq: 0,
            subscribers: 0,
            refresh_task: None,
            interval: None,
            settled_at: None,
            last_used: time::Instant::now(),
            fetcher: None,
            version,
        }
    }

    fn touch(&self) {
        self.version.send_modify(|version| *version = version.wrapping_add(1));
    }

    const fn is_unfetched(&self) -> bool {
        self.data.is_none() && self.error.is_none() && self.in_flight.is_none()
    }

    /// Last attempt finished longer than the refresh interval ago
    fn is_stale(&self, now: time::Instant) -> bool {
        self.in_flight.is_none()
            && self
                .interval
                .zip(self.settled_at)
                .is_some_and(|(period, at)| now.saturating_duration_since(at) >= period)
    }

    fn is_idle(&self, now: time::Instant, retention: Duration) -> bool {
        self.subscribers == 0
            && self.in_flight.is_none()
            && self.refresh_task.is_none()
            && now.saturating_duration_since(self.last_used) >= retention
    }
}

struct Inner {
    entries: DashMap<QueryKey, Entry>,
    next_seq: AtomicU64,
    retention: Duration,
}

/// Shared handle to the query cache
///
/// Cloning is cheap and every clone sees the same entries.
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<Inner>,
}

impl QueryCache {
    /// Create an empty cache keeping unused entries for [`DEFAULT_RETENTION`]
    #[must_use]
    pub fn new() -> Self {
        Self::with_retention(DEFAULT_RETENTION)
    }

    /// Create an empty cache keeping unused entries for `retention`
    #[must_use]
    pub fn with_retention(retention: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                entries: DashMap::new(),
                next_seq: AtomicU64::new(0),
                retention,
            }),
        }
    }

    /// Fetch `key`, joining the running request unless `force` is set
    ///
    /// The request runs on its own task, so it completes and updates the
    /// entry even if nobody awaits the returned future.
    pub fn fetch(&self, key: &QueryKey, fetcher: &Fetcher, force: bool) -> SharedFetch {
        let mut entry = self
            .inner
            .entries
            .entry(key.clone())
            .or_insert_with(Entry::new);
        entry.fetcher = Some(Arc::clone(fetcher));
        entry.last_used = time::Instant::now();

        if !force && let Some(in_flight) = &entry.in_flight {
            debug!("Joining in-flight fetch for {}", key);
            return in_flight.future.clone();
        }

        let seq = self.inner.next_seq.fetch_add(1, Ordering::Relaxed) + 1;
        let future = self.spawn_fetch(key.clone(), seq, fetcher);
        entry.in_flight = Some(InFlight {
            seq,
            future: future.clone(),
        });
        entry.touch();
        debug!("Started fetch #{} for {}", seq, key);
        future
    }

    /// Start a fetch when `key` has no value, no error and nothing running,
    /// or when its last attempt is older than its refresh interval
    ///
    /// A refetch of a stale key keeps the cached value readable until it
    /// finishes. Returns whether a fetch was started.
    pub fn fetch_if_needed(&self, key: &QueryKey, fetcher: &Fetcher) -> bool {
        let now = time::Instant::now();
        let (unfetched, stale) = self
            .inner
            .entries
            .get(key)
            .map_or((true, false), |entry| (entry.is_unfetched(), entry.is_stale(now)));

        if stale {
            debug!("{} is older than its refresh interval", key);
        }
        let needed = unfetched || stale;
        if needed {
            drop(self.fetch(key, fetcher, false));
        } else {
            debug!("Cache hit for {}", key);
        }
        needed
    }

    fn spawn_fetch(&self, key: QueryKey, seq: u64, fetcher: &Fetcher) -> SharedFetch {
        let request = fetcher();
        let cache = Arc::downgrade(&self.inner);
        let handle = tokio::spawn(async move {
            let result = AssertUnwindSafe(request)
                .catch_unwind()
                .await
                .unwrap_or(Err(ApiError::Cancelled));
            if let Some(inner) = cache.upgrade() {
                Self { inner }.complete(&key, seq, &result);
            }
            result
        });

        async move { handle.await.unwrap_or(Err(ApiError::Cancelled)) }
            .boxed()
            .shared()
    }

    fn complete(&self, key: &QueryKey, seq: u64, result: &FetchResult) {
        let Some(mut entry) = self.inner.entries.get_mut(key) else {
            debug!("Dropping fetch #{} for removed key {}", seq, key);
            return;
        };

        if entry.in_flight.as_ref().is_some_and(|in_flight| in_flight.seq == seq) {
            entry.in_flight = None;
        }
        let now = time::Instant::now();
        entry.last_used = now;

        if seq <= entry.applied_seq {
            debug!(
                "Discarding stale fetch #{} for {} (already applied #{})",
                seq, key, entry.applied_seq
            );
            entry.touch();
            return;
        }

        entry.applied_seq = seq;
        entry.settled_at = Some(now);
        match result {
            Ok(value) => {
                entry.data = Some(Arc::clone(value));
                entry.data_seq = seq;
                entry.error = None;
                entry.updated_at = Some(Utc::now());
            }
            Err(error) => {
                warn!("Fetch #{} for {} failed: {}", seq, key, error);
                entry.error = Some(error.clone());
            }
        }
        entry.touch();
    }

    /// Register interest in `key`
    ///
    /// With an `interval`, the first subscriber starts a background task that
    /// refetches the key on every tick; dropping the last [`Subscription`]
    /// stops it. A tick joins a fetch that is already running. The interval is
    /// remembered on the entry, so [`QueryCache::fetch_if_needed`] refetches it
    /// once it has gone stale without a subscriber.
    pub fn subscribe(
        &self,
        key: &QueryKey,
        fetcher: &Fetcher,
        interval: Option<Duration>,
    ) -> Subscription {
        let mut entry = self
            .inner
            .entries
            .entry(key.clone())
            .or_insert_with(Entry::new);
        entry.fetcher = Some(Arc::clone(fetcher));
        entry.subscribers += 1;
        entry.last_used = time::Instant::now();
        if interval.is_some() {
            entry.interval = interval;
        }

        if let Some(period) = interval.filter(|_| entry.refresh_task.is_none()) {
            entry.refresh_task = Some(self.spawn_refresh(key.clone(), period));
        }
        drop(entry);

        Subscription {
            cache: self.clone(),
            key: key.clone(),
        }
    }

    fn spawn_refresh(&self, key: QueryKey, period: Duration) -> JoinHandle<()> {
        let cache = Arc::downgrade(&self.inner);
        debug!("Refreshing {} every {:?}", key, period);
        tokio::spawn(async move {
            let mut ticker = time::interval_at(time::Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(cache) = upgrade(&cache) else {
                    break;
                };
                let Some(fetcher) = cache.fetcher(&key) else {
                    break;
                };
                debug!("Refresh tick for {}", key);
                drop(cache.fetch(&key, &fetcher, false));
            }
        })
    }

    fn unsubscribe(&self, key: &QueryKey) {
        let released = self.inner.entries.get_mut(key).is_some_and(|mut entry| {
            entry.subscribers = entry.subscribers.saturating_sub(1);
            entry.last_used = time::Instant::now();
            if entry.subscribers == 0
                && let Some(task) = entry.refresh_task.take()
            {
                debug!("Stopping refresh for {}", key);
                task.abort();
            }
            entry.subscribers == 0
        });

        if released {
            self.evict_idle();
        }
    }

    /// Drop every entry that has no subscriber, nothing running and has not
    /// been used for the retention window
    ///
    /// Runs whenever a key loses its last subscriber. Returns the number of
    /// entries removed.
    pub fn evict_idle(&self) -> usize {
        let now = time::Instant::now();
        let retention = self.inner.retention;
        let mut evicted = 0;
        self.inner.entries.retain(|key, entry| {
            let idle = entry.is_idle(now, retention);
            if idle {
                debug!("Evicting idle entry {}", key);
                evicted += 1;
            }
            !idle
        });
        evicted
    }

    fn fetcher(&self, key: &QueryKey) -> Option<Fetcher> {
        self.inner
            .entries
            .get(key)
            .and_then(|entry| entry.fetcher.clone())
    }

    /// Current state of `key` as a `T`
    ///
    /// A cached value of a different type reads as absent.
    #[must_use]
    pub fn snapshot<T>(&self, key: &QueryKey) -> QueryState<T>
    where
        T: Send + Sync + 'static,
    {
        self.inner
            .entries
            .get(key)
            .map_or_else(QueryState::idle, |entry| {
                let data = entry
                    .data
                    .clone()
                    .and_then(|value| value.downcast::<T>().ok());
                let is_fetching = entry.in_flight.is_some();
                QueryState {
                    is_loading: is_fetching && data.is_none(),
                    is_fetching,
                    data,
                    error: entry.error.clone(),
                    updated_at: entry.updated_at,
                }
            })
    }

    /// The running fetch of `key`, if any
    #[must_use]
    pub fn in_flight(&self, key: &QueryKey) -> Option<SharedFetch> {
        self.inner
            .entries
            .get(key)
            .and_then(|entry| entry.in_flight.as_ref().map(|in_flight| in_flight.future.clone()))
    }

    /// Receiver that changes whenever `key` starts or finishes a fetch
    #[must_use]
    pub fn watch(&self, key: &QueryKey) -> watch::Receiver<u64> {
        self.inner
            .entries
            .entry(key.clone())
            .or_insert_with(Entry::new)
            .version
            .subscribe()
    }

    /// Force a refetch of every cached key of `resource`
    ///
    /// Returns the number of fetches started.
    pub fn invalidate(&self, resource: &str) -> usize {
        let targets: Vec<(QueryKey, Fetcher)> = self
            .inner
            .entries
            .iter()
            .filter(|entry| entry.key().resource() == resource)
            .filter_map(|entry| {
                entry
                    .fetcher
                    .clone()
                    .map(|fetcher| (entry.key().clone(), fetcher))
            })
            .collect();

        for (key, fetcher) in &targets {
            drop(self.fetch(key, fetcher, true));
        }
        debug!("Invalidated {} keys of {}", targets.len(), resource);
        targets.len()
    }

    /// Drop the entry for `key`, stopping its refresh task
    ///
    /// A fetch still running for it finishes without being stored.
    pub fn remove(&self, key: &QueryKey) -> bool {
        match self.inner.entries.remove(key) {
            Some((_, entry)) => {
                if let Some(task) = entry.refresh_task {
                    task.abort();
                }
                true
            }
            None => false,
        }
    }

    /// Most recently fetched cached `T` of `resource` that `select` accepts
    pub fn find_latest<T, R>(
        &self,
        resource: &str,
        select: impl Fn(&QueryKey, &T) -> Option<R>,
    ) -> Option<R>
    where
        T: Send + Sync + 'static,
    {
        self.inner
            .entries
            .iter()
            .filter(|entry| entry.key().resource() == resource)
            .filter_map(|entry| {
                let value = entry.data.clone()?.downcast::<T>().ok()?;
                select(entry.key(), &value).map(|found| (entry.data_seq, found))
            })
            .max_by_key(|(seq, _)| *seq)
            .map(|(_, found)| found)
    }

    /// Number of live subscriptions to `key`
    #[must_use]
    pub fn subscriber_count(&self, key: &QueryKey) -> usize {
        self.inner
            .entries
            .get(key)
            .map_or(0, |entry| entry.subscribers)
    }

    /// Number of cached keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.entries.len()
    }

    /// Whether nothing is cached
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.entries.is_empty()
    }
}

fn upgrade(cache: &Weak<Inner>) -> Option<QueryCache> {
    cache.upgrade().map(|inner| QueryCache { inner })
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &self.inner.entries.len())
            .field("retention", &self.inner.retention)
            .finish_non_exhaustive()
    }
}

/// Keeps a key's background refresh alive until dropped
#[must_use = "dropping a subscription immediately stops its refresh"]
#[derive(Debug)]
pub struct Subscription {
    cache: QueryCache,
    key: QueryKey,
}

impl Subscription {
    /// Key this subscription is for
    #[must_use]
    pub const fn key(&self) -> &QueryKey {
        &self.key
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cache.unsubscribe(&self.key);
    }
}
