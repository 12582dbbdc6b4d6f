use serde::{Deserialize, Serialize};

/// Metadata provider identity. Every id handed out by a provider is scoped to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Omdb,
    Tmdb,
}

impl ProviderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Omdb => "omdb",
            Self::Tmdb => "tmdb",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One search hit, normalized across providers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultItem {
    /// Opaque, provider-scoped identifier. Never assume it is numeric.
    pub id: String,
    pub title: String,
    pub year: Option<String>,
    pub poster_url: Option<String>,
}

/// A single page of search hits in provider relevance order.
///
/// `items.len() <= total_results` is not guaranteed; providers misreport totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResultSet {
    pub items: Vec<SearchResultItem>,
    pub total_results: u64,
}

impl SearchResultSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Normalized show details. Fields the provider did not supply are `None`,
/// never an empty string or zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShowInfo {
    pub id: String,
    pub title: String,
    pub year: Option<String>,
    pub poster_url: Option<String>,
    pub plot: Option<String>,
    pub genres: Option<Vec<String>>,
    pub total_seasons: Option<u32>,
    pub rating: Option<f32>,
    pub content_rating: Option<String>, // TV-MA, TV-14, etc.
    pub cast: Option<Vec<String>>,
    pub status: Option<String>,
}

/// Outcome of normalizing a provider's detail payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShowDetails {
    Found(Box<ShowInfo>),
    NotFound { error_message: String },
}

impl ShowDetails {
    pub fn found(info: ShowInfo) -> Self {
        Self::Found(Box::new(info))
    }

    pub fn info(&self) -> Option<&ShowInfo> {
        match self {
            Self::Found(info) => Some(info),
            Self::NotFound { .. } => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Leading four-digit year of a provider date or year-range field.
///
/// `"2008–2013"` and `"2008-01-20"` both yield `"2008"`.
pub fn leading_year(value: &str) -> Option<String> {
    let year = value.trim().get(..4)?;
    if year.chars().all(|c| c.is_ascii_digit()) {
        Some(year.to_string())
    } else {
        None
    }
}
