//! Keyed request cache with in-flight deduplication.
//!
//! Rules:
//! 1. At most one call per key is in flight; later subscribers join it.
//! 2. A successful result is served without a new call until `stale_time`
//!    has passed. After that the next subscription refetches while still
//!    showing the stale value.
//! 3. When the last subscriber of a key detaches, its in-flight call is
//!    cancelled. A result whose call is no longer the key's current one is
//!    dropped on arrival.
//! 4. Failures land on their own key only and never clear cached data.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use showfinder_core::ProviderError;
use tokio::sync::watch;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::key::QueryKey;
use crate::state::QueryState;

/// Default freshness window.
pub const DEFAULT_STALE_TIME: Duration = Duration::from_secs(5 * 60);

struct InFlight {
    generation: u64,
    cancel: CancellationToken,
}

struct Entry<T> {
    data: Option<Arc<T>>,
    updated_at: Option<Instant>,
    error: Option<ProviderError>,
    in_flight: Option<InFlight>,
    subscribers: usize,
    state_tx: watch::Sender<QueryState<T>>,
}

impl<T> Entry<T> {
    fn new() -> Self {
        let (state_tx, _) = watch::channel(QueryState::idle());
        Self {
            data: None,
            updated_at: None,
            error: None,
            in_flight: None,
            subscribers: 0,
            state_tx,
        }
    }

    fn is_fresh(&self, stale_time: Duration) -> bool {
        self.data.is_some()
            && self
                .updated_at
                .is_some_and(|at| at.elapsed() < stale_time)
    }

    fn is_empty(&self) -> bool {
        self.data.is_none() && self.error.is_none()
    }

    fn publish(&self) {
        let state = if self.in_flight.is_some() {
            QueryState::loading(self.data.clone())
        } else if let Some(ref error) = self.error {
            QueryState::failed(error.clone(), self.data.clone())
        } else if let Some(ref data) = self.data {
            QueryState::success(data.clone())
        } else {
            QueryState::idle()
        };
        self.state_tx.send_replace(state);
    }
}

struct Shared<T> {
    stale_time: Duration,
    entries: Mutex<HashMap<QueryKey, Entry<T>>>,
    next_generation: AtomicU64,
}

impl<T> Shared<T> {
    fn complete(&self, key: &QueryKey, generation: u64, result: Result<T, ProviderError>) {
        let mut entries = self.entries.lock();
        let Some(entry) = entries.get_mut(key) else {
            debug!(key = %key, generation, "query entry gone, dropping result");
            return;
        };

        if entry.in_flight.as_ref().map(|f| f.generation) != Some(generation) {
            debug!(key = %key, generation, "discarding superseded query result");
            return;
        }
        entry.in_flight = None;

        match result {
            Ok(value) => {
                debug!(key = %key, generation, "query succeeded");
                entry.data = Some(Arc::new(value));
                entry.updated_at = Some(Instant::now());
                entry.error = None;
            }
            Err(ProviderError::Cancelled) => {
                debug!(key = %key, generation, "query cancelled");
            }
            Err(e) => {
                warn!(key = %key, generation, error = %e, "query failed");
                entry.error = Some(e);
            }
        }
        entry.publish();
    }

    fn detach(&self, key: &QueryKey) {
        let mut entries = self.entries.lock();
        let remove = match entries.get_mut(key) {
            Some(entry) => {
                entry.subscribers = entry.subscribers.saturating_sub(1);
                if entry.subscribers == 0 {
                    if let Some(in_flight) = entry.in_flight.take() {
                        debug!(key = %key, generation = in_flight.generation, "last subscriber left, cancelling query");
                        in_flight.cancel.cancel();
                        entry.publish();
                    }
                    entry.is_empty()
                } else {
                    false
                }
            }
            None => false,
        };
        if remove {
            entries.remove(key);
        }
    }
}

/// Shared cache/dispatcher for one result type.
///
/// Must be used from within a tokio runtime; fetches run as spawned tasks.
pub struct QueryClient<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for QueryClient<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> Default for QueryClient<T>
where
    T: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(DEFAULT_STALE_TIME)
    }
}

impl<T> QueryClient<T>
where
    T: Send + Sync + 'static,
{
    pub fn new(stale_time: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                stale_time,
                entries: Mutex::new(HashMap::new()),
                next_generation: AtomicU64::new(1),
            }),
        }
    }

    pub fn stale_time(&self) -> Duration {
        self.shared.stale_time
    }

    /// Subscribe to `key`, calling `fetch` only if nothing fresh is cached
    /// and no call for the key is already running.
    ///
    /// A disabled subscription never fetches and never surfaces cached data.
    pub fn subscribe<F, Fut>(&self, key: QueryKey, enabled: bool, fetch: F) -> Subscription<T>
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = Result<T, ProviderError>> + Send + 'static,
    {
        if !enabled {
            debug!(key = %key, "query disabled");
            let (_, receiver) = watch::channel(QueryState::idle());
            return Subscription {
                key,
                receiver,
                shared: None,
            };
        }

        let mut entries = self.shared.entries.lock();
        let entry = entries.entry(key.clone()).or_insert_with(Entry::new);
        entry.subscribers += 1;

        if entry.in_flight.is_some() {
            debug!(key = %key, "joining in-flight query");
        } else if entry.is_fresh(self.shared.stale_time) {
            debug!(key = %key, "serving fresh cached query");
        } else {
            self.start_fetch(&key, entry, fetch);
        }

        Subscription {
            receiver: entry.state_tx.subscribe(),
            key,
            shared: Some(Arc::clone(&self.shared)),
        }
    }

    fn start_fetch<F, Fut>(&self, key: &QueryKey, entry: &mut Entry<T>, fetch: F)
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = Result<T, ProviderError>> + Send + 'static,
    {
        let generation = self.shared.next_generation.fetch_add(1, Ordering::Relaxed);
        let cancel = CancellationToken::new();
        debug!(key = %key, generation, stale = entry.data.is_some(), "starting query");

        let call = fetch(cancel.clone());
        entry.in_flight = Some(InFlight {
            generation,
            cancel: cancel.clone(),
        });
        entry.error = None;
        entry.publish();

        let shared = Arc::clone(&self.shared);
        let key = key.clone();
        tokio::spawn(async move {
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(ProviderError::Cancelled),
                res = call => res,
            };
            shared.complete(&key, generation, result);
        });
    }

    /// Mark `key` stale so the next subscription refetches. Cached data stays
    /// visible while that happens.
    pub fn invalidate(&self, key: &QueryKey) {
        if let Some(entry) = self.shared.entries.lock().get_mut(key) {
            debug!(key = %key, "query invalidated");
            entry.updated_at = None;
        }
    }

    /// Drop entries nobody is watching whose data is no longer fresh.
    /// Returns how many were removed.
    pub fn evict_idle(&self) -> usize {
        let stale_time = self.shared.stale_time;
        let mut entries = self.shared.entries.lock();
        let before = entries.len();
        entries.retain(|_, e| {
            e.subscribers > 0 || e.in_flight.is_some() || e.is_fresh(stale_time)
        });
        before - entries.len()
    }

    /// Last successful value for `key`, fresh or not.
    pub fn cached(&self, key: &QueryKey) -> Option<Arc<T>> {
        self.shared
            .entries
            .lock()
            .get(key)
            .and_then(|e| e.data.clone())
    }

    pub fn in_flight_count(&self) -> usize {
        self.shared
            .entries
            .lock()
            .values()
            .filter(|e| e.in_flight.is_some())
            .count()
    }

    pub fn len(&self) -> usize {
        self.shared.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A live interest in one key. Dropping it detaches; the last detach cancels
/// any call still running for the key.
pub struct Subscription<T> {
    key: QueryKey,
    receiver: watch::Receiver<QueryState<T>>,
    shared: Option<Arc<Shared<T>>>,
}

impl<T> Subscription<T> {
    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    pub fn is_enabled(&self) -> bool {
        self.shared.is_some()
    }

    pub fn state(&self) -> QueryState<T> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next state change. Returns `false` once no further
    /// changes can arrive.
    pub async fn changed(&mut self) -> bool {
        self.receiver.changed().await.is_ok()
    }

    /// Wait until the key is no longer loading.
    pub async fn settled(&mut self) -> QueryState<T> {
        let settled = match self.receiver.wait_for(|s| !s.is_loading()).await {
            Ok(state) => Some(state.clone()),
            Err(_) => None,
        };
        settled.unwrap_or_else(|| self.state())
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.take() {
            shared.detach(&self.key);
        }
    }
}
