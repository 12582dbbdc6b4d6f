use std::future::Future;

use showfinder_core::ProviderError;
use tokio_util::sync::CancellationToken;

use crate::client::{QueryClient, Subscription};
use crate::key::QueryKey;
use crate::state::QueryState;

/// Follows whichever key a consumer currently wants.
///
/// Pointing the observer at a new key detaches from the previous one, which
/// cancels the old call if nobody else wants it. Only the current key's
/// state is ever reported, so a late result for an earlier key cannot show
/// up here.
pub struct QueryObserver<T> {
    client: QueryClient<T>,
    current: Option<Subscription<T>>,
}

impl<T> QueryObserver<T>
where
    T: Send + Sync + 'static,
{
    pub fn new(client: QueryClient<T>) -> Self {
        Self {
            client,
            current: None,
        }
    }

    /// Switch to `key`. Re-observing the same key keeps sharing any call in
    /// flight and otherwise follows the normal cache-or-fetch rules.
    pub fn observe<F, Fut>(&mut self, key: QueryKey, enabled: bool, fetch: F)
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = Result<T, ProviderError>> + Send + 'static,
    {
        // Subscribe before releasing the old subscription so an identical
        // key never drops to zero subscribers in between.
        let next = self.client.subscribe(key, enabled, fetch);
        self.current = Some(next);
    }

    pub fn key(&self) -> Option<&QueryKey> {
        self.current.as_ref().map(Subscription::key)
    }

    pub fn state(&self) -> QueryState<T> {
        self.current
            .as_ref()
            .map(Subscription::state)
            .unwrap_or_else(QueryState::idle)
    }

    pub async fn changed(&mut self) -> bool {
        match self.current.as_mut() {
            Some(sub) => sub.changed().await,
            None => false,
        }
    }

    /// Wait until the current key stops loading.
    pub async fn settled(&mut self) -> QueryState<T> {
        match self.current.as_mut() {
            Some(sub) => sub.settled().await,
            None => QueryState::idle(),
        }
    }

    /// Stop observing. Cancels the current call if this was its last subscriber.
    pub fn detach(&mut self) {
        self.current = None;
    }
}
