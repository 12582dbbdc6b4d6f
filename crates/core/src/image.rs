//! Poster helpers shared by the providers and the presentation layer.

use serde::{Deserialize, Serialize};

pub const TMDB_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// OMDb's placeholder for a missing value.
pub const NOT_AVAILABLE: &str = "N/A";

/// Requested rendition of a TMDB image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSize {
    Small,
    #[default]
    Medium,
    Large,
    Original,
}

impl ImageSize {
    /// Size token used in the TMDB image path.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Small => "w185",
            Self::Medium => "w342",
            Self::Large => "w500",
            Self::Original => "original",
        }
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a poster value may be used as an image source.
///
/// Absent, blank and the `"N/A"` sentinel are all rejected.
pub fn is_valid_poster_url(value: Option<&str>) -> bool {
    match value.map(str::trim) {
        None | Some("") | Some(NOT_AVAILABLE) => false,
        Some(_) => true,
    }
}

/// Renderable TMDB image URL for a path fragment such as `"/abc.jpg"`.
pub fn compose_image_url(path: Option<&str>, size: ImageSize) -> Option<String> {
    compose_image_url_with_base(TMDB_IMAGE_BASE_URL, path, size)
}

/// Same as [`compose_image_url`] against a custom image host.
pub fn compose_image_url_with_base(
    base: &str,
    path: Option<&str>,
    size: ImageSize,
) -> Option<String> {
    let path = path.map(str::trim).filter(|p| !p.is_empty())?;
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        Some(format!("{base}/{size}{path}"))
    } else {
        Some(format!("{base}/{size}/{path}"))
    }
}
