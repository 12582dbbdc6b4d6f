//! TMDB (The Movie Database) provider client.
//!
//! Uses TMDB API v3: https://developer.themoviedb.org/docs
//! Authenticates with a v4 read access token sent as a bearer header.

use std::time::Duration;

use reqwest::StatusCode;
use showfinder_core::config::TmdbConfig;
use showfinder_core::image::{ImageSize, compose_image_url_with_base};
use showfinder_core::types::leading_year;
use showfinder_core::{
    ProviderError, ProviderKind, SearchQuery, SearchResultItem, SearchResultSet, ShowDetails,
    ShowInfo,
};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::http::{self, RawResponse};
use crate::provider::ShowProvider;
use crate::total_results;

/// Size used for posters embedded in normalized results.
const POSTER_SIZE: ImageSize = ImageSize::Medium;

pub struct TmdbClient {
    read_token: String,
    base_url: String,
    image_base_url: String,
    language: String,
    append_to_response: Option<String>,
    timeout: Duration,
    client: reqwest::Client,
}

impl TmdbClient {
    pub fn new(config: &TmdbConfig, timeout: Duration) -> Self {
        Self {
            read_token: config.read_token.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            image_base_url: config.image_base_url.clone(),
            language: config.language.clone(),
            append_to_response: None,
            timeout,
            client: reqwest::Client::new(),
        }
    }

    /// Extra sub-resources for detail lookups, e.g. `"credits,external_ids"`.
    pub fn with_append_to_response(mut self, append: impl Into<String>) -> Self {
        self.append_to_response = Some(append.into());
        self
    }

    async fn get(
        &self,
        path: &str,
        params: &[(&str, &str)],
        cancel: &CancellationToken,
    ) -> Result<RawResponse, ProviderError> {
        let url = format!("{}{path}", self.base_url);
        debug!(url = %url, ?params, "TMDB request");

        let request = self
            .client
            .get(&url)
            .bearer_auth(&self.read_token)
            .header(reqwest::header::CONTENT_TYPE, "application/json;charset=utf-8")
            .query(params);

        http::execute(request, self.timeout, cancel).await
    }

    fn poster_url(&self, data: &serde_json::Value) -> Option<String> {
        compose_image_url_with_base(&self.image_base_url, data["poster_path"].as_str(), POSTER_SIZE)
    }
}

#[async_trait::async_trait]
impl ShowProvider for TmdbClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Tmdb
    }

    async fn search(
        &self,
        query: &str,
        page: u32,
        cancel: &CancellationToken,
    ) -> Result<SearchResultSet, ProviderError> {
        let query = SearchQuery::new(query);
        if !query.is_searchable() {
            debug!(query = %query, "TMDB search skipped, query too short");
            return Ok(SearchResultSet::empty());
        }

        let page = page.max(1).to_string();
        let params = [
            ("query", query.as_str()),
            ("page", page.as_str()),
            ("language", self.language.as_str()),
            ("include_adult", "false"),
        ];
        let raw = self.get("/search/tv", &params, cancel).await?;
        if !raw.status.is_success() {
            return Err(status_error(&raw));
        }

        let data = raw.json()?;
        if let Some(message) = business_failure(&data) {
            return Err(ProviderError::Business(message));
        }
        Ok(self.parse_search(&data))
    }

    async fn get_details(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> Result<ShowDetails, ProviderError> {
        let tv_id = parse_tv_id(id)?;

        let mut params = vec![("language", self.language.as_str())];
        if let Some(ref append) = self.append_to_response {
            params.push(("append_to_response", append.as_str()));
        }

        let raw = self.get(&format!("/tv/{tv_id}"), &params, cancel).await?;

        let details = if raw.status == StatusCode::NOT_FOUND {
            ShowDetails::NotFound {
                error_message: raw
                    .json()
                    .ok()
                    .and_then(|data| business_failure(&data))
                    .unwrap_or_else(|| "The resource you requested could not be found.".to_string()),
            }
        } else if !raw.status.is_success() {
            return Err(status_error(&raw));
        } else {
            self.parse_details(&raw.json()?)
        };

        match details {
            ShowDetails::NotFound { error_message } => Err(ProviderError::Business(error_message)),
            found => Ok(found),
        }
    }
}

impl TmdbClient {
    fn parse_search(&self, data: &serde_json::Value) -> SearchResultSet {
        let results = data["results"].as_array().cloned().unwrap_or_default();

        SearchResultSet {
            items: results
                .iter()
                .filter_map(|r| {
                    let id = r["id"].as_u64()?;
                    Some(SearchResultItem {
                        id: id.to_string(),
                        title: text(&r["name"]).unwrap_or_else(|| "Unknown".to_string()),
                        year: r["first_air_date"].as_str().and_then(leading_year),
                        poster_url: self.poster_url(r),
                    })
                })
                .collect(),
            total_results: total_results(&data["total_results"]),
        }
    }

    fn parse_details(&self, data: &serde_json::Value) -> ShowDetails {
        if let Some(message) = business_failure(data) {
            return ShowDetails::NotFound {
                error_message: message,
            };
        }

        ShowDetails::found(ShowInfo {
            id: data["id"]
                .as_u64()
                .map(|id| id.to_string())
                .unwrap_or_default(),
            title: text(&data["name"]).unwrap_or_else(|| "Unknown".to_string()),
            year: data["first_air_date"].as_str().and_then(leading_year),
            poster_url: self.poster_url(data),
            plot: text(&data["overview"]),
            genres: data["genres"].as_array().map(|gs| {
                gs.iter()
                    .filter_map(|g| g["name"].as_str().map(|s| s.to_string()))
                    .collect()
            }),
            total_seasons: data["number_of_seasons"].as_u64().map(|n| n as u32),
            rating: data["vote_average"].as_f64().map(|r| r as f32),
            content_rating: None,
            cast: data["credits"]["cast"].as_array().map(|cast| {
                cast.iter()
                    .take(20)
                    .filter_map(|p| p["name"].as_str().map(|s| s.to_string()))
                    .collect()
            }),
            status: text(&data["status"]),
        })
    }
}

/// TMDB ids are positive integers; anything else never reaches the network.
fn parse_tv_id(id: &str) -> Result<u64, ProviderError> {
    match id.trim().parse::<u64>() {
        Ok(0) | Err(_) => Err(ProviderError::InvalidArgument(format!(
            "invalid TMDB tv id '{id}'"
        ))),
        Ok(tv_id) => Ok(tv_id),
    }
}

fn text(value: &serde_json::Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// TMDB error bodies look like `{"success": false, "status_code": 34, "status_message": "..."}`.
fn business_failure(data: &serde_json::Value) -> Option<String> {
    if data["success"].as_bool() == Some(false) {
        Some(text(&data["status_message"]).unwrap_or_else(|| "TMDB request failed".to_string()))
    } else {
        None
    }
}

fn status_error(raw: &RawResponse) -> ProviderError {
    let detail = if raw.body.trim().is_empty() {
        raw.status
            .canonical_reason()
            .unwrap_or("unknown status")
            .to_string()
    } else {
        raw.body.trim().to_string()
    };
    ProviderError::network(
        Some(raw.status.as_u16()),
        format!("TMDB error {}: {detail}", raw.status.as_u16()),
    )
}

#[cfg(test)]
mod tests {
    use showfinder_core::config::TmdbConfig;

    use super::*;

    fn client() -> TmdbClient {
        TmdbClient::new(
            &TmdbConfig {
                read_token: "token".into(),
                base_url: "https://api.themoviedb.org/3/".into(),
                image_base_url: "https://image.tmdb.org/t/p".into(),
                language: "en-US".into(),
            },
            Duration::from_secs(5),
        )
    }

    #[test]
    fn parse_search_from_json() {
        let json = serde_json::json!({
            "page": 1,
            "results": [
                {
                    "id": 1396,
                    "name": "Breaking Bad",
                    "first_air_date": "2008-01-20",
                    "poster_path": "/ggFHVNu6YYI5L9pCfOacjizRGt.jpg"
                },
                {
                    "id": 62560,
                    "name": "Mr. Robot",
                    "first_air_date": "",
                    "poster_path": null
                },
                { "name": "missing id" }
            ],
            "total_results": 2,
            "total_pages": 1
        });

        let set = client().parse_search(&json);
        assert_eq!(set.total_results, 2);
        assert_eq!(set.items.len(), 2);
        assert_eq!(set.items[0].id, "1396");
        assert_eq!(set.items[0].year.as_deref(), Some("2008"));
        assert_eq!(
            set.items[0].poster_url.as_deref(),
            Some("https://image.tmdb.org/t/p/w342/ggFHVNu6YYI5L9pCfOacjizRGt.jpg")
        );
        assert_eq!(set.items[1].year, None);
        assert_eq!(set.items[1].poster_url, None);
    }

    #[test]
    fn parse_series_details_from_json() {
        let json = serde_json::json!({
            "id": 1396,
            "name": "Breaking Bad",
            "overview": "Walter White, a New Mexico chemistry teacher...",
            "first_air_date": "2008-01-20",
            "number_of_seasons": 5,
            "vote_average": 8.9,
            "status": "Ended",
            "poster_path": "/bb.jpg",
            "genres": [
                { "id": 18, "name": "Drama" },
                { "id": 80, "name": "Crime" }
            ]
        });

        let details = client().parse_details(&json);
        let info = details.info().unwrap();
        assert_eq!(info.id, "1396");
        assert_eq!(info.title, "Breaking Bad");
        assert_eq!(info.year.as_deref(), Some("2008"));
        assert_eq!(info.total_seasons, Some(5));
        assert_eq!(info.status.as_deref(), Some("Ended"));
        assert_eq!(info.genres.as_ref().unwrap(), &vec!["Drama".to_string(), "Crime".to_string()]);
        assert!(info.poster_url.as_ref().unwrap().contains("/bb.jpg"));
        assert_eq!(info.cast, None);
    }

    #[test]
    fn empty_overview_is_absent() {
        let json = serde_json::json!({ "id": 7, "name": "Quiet Show", "overview": "" });
        let info = client().parse_details(&json).info().cloned().unwrap();
        assert_eq!(info.plot, None);
        assert_eq!(info.genres, None);
        assert_eq!(info.total_seasons, None);
    }

    #[test]
    fn tv_id_must_be_positive_integer() {
        assert_eq!(parse_tv_id("1396").unwrap(), 1396);
        for bad in ["", "  ", "0", "tt0903747", "-4"] {
            assert!(matches!(
                parse_tv_id(bad),
                Err(ProviderError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn success_false_is_business_failure() {
        let json = serde_json::json!({
            "success": false,
            "status_code": 34,
            "status_message": "The resource you requested could not be found."
        });
        assert_eq!(
            business_failure(&json).as_deref(),
            Some("The resource you requested could not be found.")
        );
        assert_eq!(business_failure(&serde_json::json!({ "results": [] })), None);
    }
}
