use std::sync::Arc;
use std::time::Duration;

use showfinder_core::{ProviderKind, SearchQuery, SearchResultSet, ShowDetails};
use showfinder_metadata::ShowProvider;
use showfinder_query::{QueryClient, QueryKey, QueryObserver, QueryState};
use tracing::info;

use crate::gate::SearchGate;

/// One user's search screen and detail screen against a single provider.
///
/// Search results are requested only through the gate. Detail lookups use
/// the opaque id a search result carried.
pub struct SearchSession {
    provider: Arc<dyn ShowProvider>,
    gate: SearchGate,
    search: QueryObserver<SearchResultSet>,
    details: QueryObserver<ShowDetails>,
}

impl SearchSession {
    pub fn new(provider: Arc<dyn ShowProvider>, stale_time: Duration, min_chars: usize) -> Self {
        Self::with_clients(
            provider,
            QueryClient::new(stale_time),
            QueryClient::new(stale_time),
            min_chars,
        )
    }

    /// Build against existing clients so several sessions share one cache.
    pub fn with_clients(
        provider: Arc<dyn ShowProvider>,
        search: QueryClient<SearchResultSet>,
        details: QueryClient<ShowDetails>,
        min_chars: usize,
    ) -> Self {
        Self {
            provider,
            gate: SearchGate::new(min_chars),
            search: QueryObserver::new(search),
            details: QueryObserver::new(details),
        }
    }

    pub fn provider(&self) -> ProviderKind {
        self.provider.kind()
    }

    pub fn gate(&self) -> &SearchGate {
        &self.gate
    }

    pub fn input(&mut self, text: impl Into<String>) {
        self.gate.input(text);
    }

    /// Submit the buffered text. Returns the query when the gate accepted it
    /// and a search was requested.
    pub fn submit(&mut self) -> Option<SearchQuery> {
        let query = self.gate.submit()?;
        let kind = self.provider.kind();
        info!(provider = %kind, query = %query, "searching");

        let key = QueryKey::search(kind, &query, 1);
        let provider = Arc::clone(&self.provider);
        let text = query.as_str().to_string();
        // Providers answer under-length queries with an empty set themselves.
        self.search.observe(key, true, move |cancel| async move {
            provider.search(&text, 1, &cancel).await
        });
        Some(query)
    }

    /// Open the detail view for an id taken from a search result. A blank id
    /// still goes to the provider so its `InvalidArgument` is reported.
    pub fn show_details(&mut self, id: &str) {
        let kind = self.provider.kind();
        let id = id.trim().to_string();
        info!(provider = %kind, id = %id, "loading details");

        let key = QueryKey::details(kind, &id);
        let provider = Arc::clone(&self.provider);
        self.details.observe(key, true, move |cancel| async move {
            provider.get_details(&id, &cancel).await
        });
    }

    /// Leave the detail view, cancelling its lookup if still running.
    pub fn close_details(&mut self) {
        self.details.detach();
    }

    pub fn search_state(&self) -> QueryState<SearchResultSet> {
        self.search.state()
    }

    pub fn details_state(&self) -> QueryState<ShowDetails> {
        self.details.state()
    }

    pub async fn search_settled(&mut self) -> QueryState<SearchResultSet> {
        self.search.settled().await
    }

    pub async fn details_settled(&mut self) -> QueryState<ShowDetails> {
        self.details.settled().await
    }
}
