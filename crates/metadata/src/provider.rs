use showfinder_core::{ProviderError, ProviderKind, SearchResultSet, ShowDetails};
use tokio_util::sync::CancellationToken;

/// A show metadata source that can search by title and look up one show.
///
/// Each implementation normalizes its own wire format; callers never see
/// provider-specific shapes.
#[async_trait::async_trait]
pub trait ShowProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Search TV series by title. `page` is 1-based.
    ///
    /// Queries shorter than two characters after trimming return an empty
    /// set without touching the network. A provider "not found" answer is
    /// also an empty set.
    async fn search(
        &self,
        query: &str,
        page: u32,
        cancel: &CancellationToken,
    ) -> Result<SearchResultSet, ProviderError>;

    /// Fetch details for a provider-scoped id.
    ///
    /// Unlike search, an unknown id is always a `ProviderError::Business`.
    async fn get_details(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> Result<ShowDetails, ProviderError>;
}
