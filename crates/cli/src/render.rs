//! Plain-text views of query state.

use showfinder_core::error::GENERIC_ERROR_MESSAGE;
use showfinder_core::{ProviderError, SearchResultSet, ShowDetails, ShowInfo, is_valid_poster_url};
use showfinder_query::{QueryState, QueryStatus};

pub const LOADING: &str = "Loading...";
pub const NO_RESULTS: &str = "No results.";

/// Error text shown to the user: the message verbatim, or a generic fallback.
pub fn error_text(error: Option<&ProviderError>) -> String {
    error
        .map(ProviderError::user_message)
        .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string())
}

pub fn search_view(query: &str, state: &QueryState<SearchResultSet>) -> String {
    let mut lines = vec![format!("Search results for {query}")];

    match state.status {
        QueryStatus::Idle => {}
        QueryStatus::Loading => lines.push(LOADING.to_string()),
        QueryStatus::Error => lines.push(error_text(state.error.as_ref())),
        QueryStatus::Success => {
            if state.data.as_ref().is_none_or(|set| set.is_empty()) {
                lines.push(NO_RESULTS.to_string());
            }
        }
    }

    // Stale or last-good items stay listed under a loading or error line.
    if let Some(set) = &state.data {
        for item in &set.items {
            let title = match &item.year {
                Some(year) => format!("{} ({year})", item.title),
                None => item.title.clone(),
            };
            lines.push(format!("  {title}  [{}]", item.id));
        }
    }

    lines.join("\n")
}

pub fn details_view(state: &QueryState<ShowDetails>) -> String {
    match state.status {
        QueryStatus::Idle => String::new(),
        QueryStatus::Loading => LOADING.to_string(),
        QueryStatus::Error => error_text(state.error.as_ref()),
        QueryStatus::Success => match state.data.as_deref() {
            Some(ShowDetails::Found(info)) => info_lines(info).join("\n"),
            Some(ShowDetails::NotFound { error_message }) => {
                if error_message.trim().is_empty() {
                    GENERIC_ERROR_MESSAGE.to_string()
                } else {
                    error_message.clone()
                }
            }
            None => String::new(),
        },
    }
}

fn info_lines(info: &ShowInfo) -> Vec<String> {
    let mut lines = vec![info.title.clone()];
    if let Some(year) = &info.year {
        lines.push(format!("Year: {year}"));
    }
    if let Some(rating) = &info.content_rating {
        lines.push(format!("Rated: {rating}"));
    }
    if let Some(genres) = &info.genres {
        lines.push(format!("Genres: {}", genres.join(", ")));
    }
    if let Some(seasons) = info.total_seasons {
        lines.push(format!("Seasons: {seasons}"));
    }
    if let Some(status) = &info.status {
        lines.push(format!("Status: {status}"));
    }
    if let Some(rating) = info.rating {
        lines.push(format!("Rating: {rating:.1}"));
    }
    if let Some(cast) = &info.cast {
        lines.push(format!("Cast: {}", cast.join(", ")));
    }
    if is_valid_poster_url(info.poster_url.as_deref()) {
        if let Some(poster) = &info.poster_url {
            lines.push(format!("Poster: {poster}"));
        }
    }
    if let Some(plot) = &info.plot {
        lines.push(format!("Plot: {plot}"));
    }
    lines
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use showfinder_core::SearchResultItem;

    use super::*;

    fn item(id: &str, title: &str, year: Option<&str>) -> SearchResultItem {
        SearchResultItem {
            id: id.to_string(),
            title: title.to_string(),
            year: year.map(str::to_string),
            poster_url: None,
        }
    }

    #[test]
    fn search_view_states() {
        let loading = QueryState::<SearchResultSet>::loading(None);
        assert_eq!(search_view("dark", &loading), "Search results for dark\nLoading...");

        let empty = QueryState::success(Arc::new(SearchResultSet::empty()));
        assert!(search_view("zzqx", &empty).ends_with(NO_RESULTS));

        let failed = QueryState::<SearchResultSet>::failed(
            ProviderError::Business("Too many results.".into()),
            None,
        );
        assert!(search_view("th", &failed).ends_with("Too many results."));

        let blank = QueryState::<SearchResultSet>::failed(ProviderError::Business(" ".into()), None);
        assert!(search_view("th", &blank).ends_with(GENERIC_ERROR_MESSAGE));
    }

    #[test]
    fn search_view_lists_title_year_and_id() {
        let set = SearchResultSet {
            items: vec![
                item("tt0903747", "Breaking Bad", Some("2008")),
                item("1396", "Untitled", None),
            ],
            total_results: 2,
        };
        let view = search_view("breaking", &QueryState::success(Arc::new(set)));
        assert!(view.contains("Breaking Bad (2008)  [tt0903747]"));
        assert!(view.contains("  Untitled  [1396]"));
        assert!(!view.contains(NO_RESULTS));
    }

    #[test]
    fn details_view_hides_sentinel_poster() {
        let info = ShowInfo {
            id: "tt0903747".into(),
            title: "Breaking Bad".into(),
            year: Some("2008".into()),
            poster_url: Some("N/A".into()),
            plot: Some("A chemistry teacher turns to crime.".into()),
            genres: Some(vec!["Crime".into(), "Drama".into()]),
            total_seasons: Some(5),
            ..Default::default()
        };
        let view = details_view(&QueryState::success(Arc::new(ShowDetails::found(info.clone()))));
        assert!(view.starts_with("Breaking Bad\nYear: 2008"));
        assert!(view.contains("Genres: Crime, Drama"));
        assert!(view.contains("Seasons: 5"));
        assert!(!view.contains("Poster"));

        let with_poster = ShowInfo {
            poster_url: Some("https://m.media-amazon.com/images/bb.jpg".into()),
            ..info
        };
        let view = details_view(&QueryState::success(Arc::new(ShowDetails::found(with_poster))));
        assert!(view.contains("Poster: https://m.media-amazon.com/images/bb.jpg"));
    }

    #[test]
    fn details_view_errors_are_verbatim() {
        let failed = QueryState::<ShowDetails>::failed(
            ProviderError::Business("Incorrect IMDb ID.".into()),
            None,
        );
        assert_eq!(details_view(&failed), "Incorrect IMDb ID.");
        assert_eq!(error_text(None), GENERIC_ERROR_MESSAGE);
        assert_eq!(details_view(&QueryState::idle()), "");
    }
}
