use serde::{Deserialize, Serialize};

/// Queries shorter than this (after trimming) never reach a provider.
pub const MIN_QUERY_CHARS: usize = 2;

/// A user search string, stored trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchQuery(String);

impl SearchQuery {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters, not bytes.
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn meets_minimum(&self, min_chars: usize) -> bool {
        self.char_len() >= min_chars
    }

    /// Long enough to be sent to a provider.
    pub fn is_searchable(&self) -> bool {
        self.meets_minimum(MIN_QUERY_CHARS)
    }
}

impl std::fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
