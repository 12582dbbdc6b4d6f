mod http;
pub mod omdb;
pub mod provider;
pub mod tmdb;

use std::sync::Arc;

use showfinder_core::{Config, ProviderKind};

pub use omdb::OmdbClient;
pub use provider::ShowProvider;
pub use tmdb::TmdbClient;

/// Construct the client for `kind` from process configuration.
pub fn build_provider(kind: ProviderKind, config: &Config) -> Arc<dyn ShowProvider> {
    match kind {
        ProviderKind::Omdb => Arc::new(OmdbClient::new(&config.omdb, config.request_timeout)),
        ProviderKind::Tmdb => Arc::new(TmdbClient::new(&config.tmdb, config.request_timeout)),
    }
}

/// Parse a total-results field defensively.
///
/// OMDb sends a numeric string, TMDB a number. Anything else counts as zero.
pub(crate) fn total_results(value: &serde_json::Value) -> u64 {
    match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}
