//! Checks against the real providers. Run with
//! `OMDB_API_KEY=... TMDB_READ_TOKEN=... cargo test -p showfinder-metadata -- --ignored`.

use showfinder_core::{Config, ProviderError, ProviderKind, SearchResultSet};
use showfinder_metadata::build_provider;
use tokio_util::sync::CancellationToken;

fn config() -> Config {
    Config::from_env().expect("OMDB_API_KEY and TMDB_READ_TOKEN must be set")
}

#[tokio::test]
#[ignore = "hits the real OMDb API"]
async fn omdb_search_returns_titled_results_with_years() {
    let omdb = build_provider(ProviderKind::Omdb, &config());
    let set = omdb.search("br", 1, &CancellationToken::new()).await.unwrap();

    let first = set.items.first().expect("at least one result");
    assert!(!first.title.is_empty());
    let year = first.year.as_deref().expect("year");
    assert_eq!(year.len(), 4);
    assert!(year.chars().all(|c| c.is_ascii_digit()));
}

#[tokio::test]
#[ignore = "hits the real OMDb and TMDB APIs"]
async fn nonsense_query_is_empty_for_both_providers() {
    let config = config();
    for kind in [ProviderKind::Omdb, ProviderKind::Tmdb] {
        let provider = build_provider(kind, &config);
        let set = provider
            .search("xyzzynoresults123", 1, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(set, SearchResultSet::empty(), "{kind}");
    }
}

#[tokio::test]
#[ignore = "hits the real OMDb and TMDB APIs"]
async fn unknown_ids_fail_with_provider_message() {
    let config = config();
    for (kind, id) in [(ProviderKind::Omdb, "tt0000000x"), (ProviderKind::Tmdb, "999999999")] {
        let provider = build_provider(kind, &config);
        match provider.get_details(id, &CancellationToken::new()).await {
            Err(ProviderError::Business(message)) => assert!(!message.is_empty(), "{kind}"),
            other => panic!("{kind}: expected business error, got {other:?}"),
        }
    }
}
