use showfinder_core::{ProviderKind, SearchQuery};

/// Identity of one cacheable request: provider, operation and its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    provider: ProviderKind,
    operation: &'static str,
    params: Vec<String>,
}

impl QueryKey {
    pub fn new<I, S>(provider: ProviderKind, operation: &'static str, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            provider,
            operation,
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    pub fn search(provider: ProviderKind, query: &SearchQuery, page: u32) -> Self {
        Self::new(
            provider,
            "search",
            [query.as_str().to_string(), page.to_string()],
        )
    }

    pub fn details(provider: ProviderKind, id: &str) -> Self {
        Self::new(provider, "details", [id.trim()])
    }

    pub fn provider(&self) -> ProviderKind {
        self.provider
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}[{}]", self.provider, self.operation, self.params.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_differ_by_provider_operation_and_params() {
        let q = SearchQuery::new("breaking");
        let omdb = QueryKey::search(ProviderKind::Omdb, &q, 1);
        assert_eq!(omdb, QueryKey::search(ProviderKind::Omdb, &SearchQuery::new(" breaking "), 1));
        assert_ne!(omdb, QueryKey::search(ProviderKind::Tmdb, &q, 1));
        assert_ne!(omdb, QueryKey::search(ProviderKind::Omdb, &q, 2));
        assert_ne!(omdb, QueryKey::details(ProviderKind::Omdb, "breaking"));
        assert_eq!(omdb.to_string(), "omdb/search[breaking,1]");
    }
}
