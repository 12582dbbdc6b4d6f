//! Process configuration, resolved once at startup.

use std::time::Duration;

use crate::error::ConfigError;
use crate::image::TMDB_IMAGE_BASE_URL;
use crate::query::MIN_QUERY_CHARS;

pub const OMDB_BASE_URL: &str = "https://www.omdbapi.com/";
pub const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";

pub const OMDB_KEY_VAR: &str = "OMDB_API_KEY";
pub const TMDB_TOKEN_VAR: &str = "TMDB_READ_TOKEN";

/// Synopsis length requested from OMDb detail lookups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlotLength {
    Short,
    #[default]
    Full,
}

impl PlotLength {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Full => "full",
        }
    }
}

#[derive(Debug, Clone)]
pub struct OmdbConfig {
    pub api_key: String,
    pub base_url: String,
    pub plot: PlotLength,
}

#[derive(Debug, Clone)]
pub struct TmdbConfig {
    pub read_token: String,
    pub base_url: String,
    pub image_base_url: String,
    /// BCP-47 tag sent as `language`.
    pub language: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub omdb: OmdbConfig,
    pub tmdb: TmdbConfig,
    pub request_timeout: Duration,
    pub stale_time: Duration,
    pub min_query_chars: usize,
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = get(OMDB_KEY_VAR).ok_or(ConfigError::Missing(OMDB_KEY_VAR))?;
        let read_token = get(TMDB_TOKEN_VAR).ok_or(ConfigError::Missing(TMDB_TOKEN_VAR))?;

        let plot = match get("SHOWFINDER_PLOT").as_deref() {
            None | Some("full") => PlotLength::Full,
            Some("short") => PlotLength::Short,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "SHOWFINDER_PLOT",
                    reason: format!("expected 'short' or 'full', got '{other}'"),
                });
            }
        };

        let stale_secs = parse_number(get("SHOWFINDER_STALE_SECS"), "SHOWFINDER_STALE_SECS", 300)?;
        let timeout_secs =
            parse_number(get("SHOWFINDER_TIMEOUT_SECS"), "SHOWFINDER_TIMEOUT_SECS", 10)?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "SHOWFINDER_TIMEOUT_SECS",
                reason: "must be at least 1".to_string(),
            });
        }
        let min_query_chars = parse_number(
            get("SHOWFINDER_MIN_QUERY_CHARS"),
            "SHOWFINDER_MIN_QUERY_CHARS",
            MIN_QUERY_CHARS as u64,
        )? as usize;

        Ok(Self {
            omdb: OmdbConfig {
                api_key,
                base_url: get("SHOWFINDER_OMDB_URL").unwrap_or_else(|| OMDB_BASE_URL.to_string()),
                plot,
            },
            tmdb: TmdbConfig {
                read_token,
                base_url: get("SHOWFINDER_TMDB_URL").unwrap_or_else(|| TMDB_BASE_URL.to_string()),
                image_base_url: get("SHOWFINDER_TMDB_IMAGE_URL")
                    .unwrap_or_else(|| TMDB_IMAGE_BASE_URL.to_string()),
                language: get("SHOWFINDER_LANGUAGE").unwrap_or_else(|| "en-US".to_string()),
            },
            request_timeout: Duration::from_secs(timeout_secs),
            stale_time: Duration::from_secs(stale_secs),
            min_query_chars,
        })
    }
}

fn parse_number(
    value: Option<String>,
    var: &'static str,
    default: u64,
) -> Result<u64, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) => v.parse().map_err(|_| ConfigError::Invalid {
            var,
            reason: format!("expected a non-negative integer, got '{v}'"),
        }),
    }
}
