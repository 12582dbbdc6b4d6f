//! OMDb (Open Movie Database) provider client.
//!
//! Uses the OMDb HTTP API: https://www.omdbapi.com/
//! Every response carries a `Response: "True" | "False"` discriminator; on
//! `"False"` the `Error` string says what went wrong.

use std::time::Duration;

use serde::Deserialize;
use showfinder_core::config::{OmdbConfig, PlotLength};
use showfinder_core::image::{NOT_AVAILABLE, is_valid_poster_url};
use showfinder_core::types::leading_year;
use showfinder_core::{
    ProviderError, ProviderKind, SearchQuery, SearchResultItem, SearchResultSet, ShowDetails,
    ShowInfo,
};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::http;
use crate::provider::ShowProvider;
use crate::total_results;

/// Substring (case-insensitive) marking an empty search rather than a failure.
const NOT_FOUND_MARKER: &str = "not found";

pub struct OmdbClient {
    api_key: String,
    base_url: String,
    plot: PlotLength,
    timeout: Duration,
    client: reqwest::Client,
}

impl OmdbClient {
    pub fn new(config: &OmdbConfig, timeout: Duration) -> Self {
        Self {
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            plot: config.plot,
            timeout,
            client: reqwest::Client::new(),
        }
    }

    /// Override the synopsis length requested by detail lookups.
    pub fn with_plot(mut self, plot: PlotLength) -> Self {
        self.plot = plot;
        self
    }

    async fn get_json(
        &self,
        params: &[(&str, String)],
        cancel: &CancellationToken,
    ) -> Result<serde_json::Value, ProviderError> {
        debug!(base_url = %self.base_url, ?params, "OMDb request");

        let mut all_params: Vec<(&str, &str)> =
            vec![("apikey", self.api_key.as_str()), ("type", "series")];
        all_params.extend(params.iter().map(|(k, v)| (*k, v.as_str())));

        let request = self.client.get(&self.base_url).query(&all_params);
        let raw = http::execute(request, self.timeout, cancel).await?;

        if !raw.status.is_success() {
            return Err(ProviderError::network(
                Some(raw.status.as_u16()),
                format!("OMDb returned {}", raw.status),
            ));
        }

        raw.json()
    }
}

#[async_trait::async_trait]
impl ShowProvider for OmdbClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Omdb
    }

    async fn search(
        &self,
        query: &str,
        page: u32,
        cancel: &CancellationToken,
    ) -> Result<SearchResultSet, ProviderError> {
        let query = SearchQuery::new(query);
        if !query.is_searchable() {
            debug!(query = %query, "OMDb search skipped, query too short");
            return Ok(SearchResultSet::empty());
        }

        let params = [
            ("s", query.as_str().to_string()),
            ("page", page.max(1).to_string()),
        ];
        let data = self.get_json(&params, cancel).await?;
        parse_search(data)
    }

    async fn get_details(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> Result<ShowDetails, ProviderError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(ProviderError::InvalidArgument("missing IMDb id".to_string()));
        }

        let params = [("i", id.to_string()), ("plot", self.plot.as_str().to_string())];
        let data = self.get_json(&params, cancel).await?;

        match parse_details(data, id)? {
            ShowDetails::NotFound { error_message } => Err(ProviderError::Business(error_message)),
            found => Ok(found),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "Response")]
enum SearchResponse {
    #[serde(rename = "True")]
    Found {
        #[serde(rename = "Search", default)]
        search: Vec<SearchItem>,
        #[serde(rename = "totalResults", default)]
        total_results: Option<serde_json::Value>,
    },
    #[serde(rename = "False")]
    Failed {
        #[serde(rename = "Error", default)]
        error: String,
    },
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "imdbID")]
    imdb_id: Option<String>,
    #[serde(rename = "Poster")]
    poster: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "Response")]
enum DetailsResponse {
    #[serde(rename = "True")]
    Found(Box<Series>),
    #[serde(rename = "False")]
    Failed {
        #[serde(rename = "Error", default)]
        error: String,
    },
}

#[derive(Debug, Deserialize)]
struct Series {
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "Rated")]
    rated: Option<String>,
    #[serde(rename = "Genre")]
    genre: Option<String>,
    #[serde(rename = "Actors")]
    actors: Option<String>,
    #[serde(rename = "Plot")]
    plot: Option<String>,
    #[serde(rename = "Poster")]
    poster: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
    #[serde(rename = "imdbID")]
    imdb_id: Option<String>,
    #[serde(rename = "totalSeasons")]
    total_seasons: Option<String>,
}

fn decode<T: serde::de::DeserializeOwned>(data: serde_json::Value) -> Result<T, ProviderError> {
    serde_json::from_value(data)
        .map_err(|e| ProviderError::network(None, format!("unexpected OMDb payload: {e}")))
}

/// OMDb writes "N/A" for unknown values; treat it, and blanks, as absent.
fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && v != NOT_AVAILABLE)
}

fn split_list(value: Option<String>) -> Option<Vec<String>> {
    present(value).map(|v| {
        v.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    })
}

fn poster(value: Option<String>) -> Option<String> {
    value.filter(|p| is_valid_poster_url(Some(p)))
}

fn parse_search(data: serde_json::Value) -> Result<SearchResultSet, ProviderError> {
    match decode::<SearchResponse>(data)? {
        SearchResponse::Failed { error } => {
            if error.to_lowercase().contains(NOT_FOUND_MARKER) {
                Ok(SearchResultSet::empty())
            } else {
                Err(ProviderError::Business(error))
            }
        }
        SearchResponse::Found {
            search,
            total_results: total,
        } => Ok(SearchResultSet {
            items: search
                .into_iter()
                .filter_map(|item| {
                    let id = present(item.imdb_id)?;
                    Some(SearchResultItem {
                        id,
                        title: present(item.title).unwrap_or_else(|| "Unknown".to_string()),
                        year: present(item.year).as_deref().and_then(leading_year),
                        poster_url: poster(item.poster),
                    })
                })
                .collect(),
            total_results: total.as_ref().map(total_results).unwrap_or(0),
        }),
    }
}

fn parse_details(data: serde_json::Value, requested_id: &str) -> Result<ShowDetails, ProviderError> {
    let series = match decode::<DetailsResponse>(data)? {
        DetailsResponse::Failed { error } => {
            return Ok(ShowDetails::NotFound {
                error_message: error,
            });
        }
        DetailsResponse::Found(series) => *series,
    };

    Ok(ShowDetails::found(ShowInfo {
        id: present(series.imdb_id).unwrap_or_else(|| requested_id.to_string()),
        title: present(series.title).unwrap_or_else(|| "Unknown".to_string()),
        year: present(series.year).as_deref().and_then(leading_year),
        poster_url: poster(series.poster),
        plot: present(series.plot),
        genres: split_list(series.genre),
        total_seasons: present(series.total_seasons).and_then(|s| s.parse().ok()),
        rating: present(series.imdb_rating).and_then(|s| s.parse().ok()),
        content_rating: present(series.rated),
        cast: split_list(series.actors),
        status: None,
    }))
}
