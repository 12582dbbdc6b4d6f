use std::time::Duration;

use serde_json::json;
use showfinder_core::config::TmdbConfig;
use showfinder_core::{ProviderError, ProviderKind, SearchResultSet};
use showfinder_metadata::{ShowProvider, TmdbClient};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> TmdbClient {
    TmdbClient::new(
        &TmdbConfig {
            read_token: "read-token".into(),
            base_url: server.uri(),
            image_base_url: "https://image.tmdb.org/t/p".into(),
            language: "en-US".into(),
        },
        Duration::from_secs(5),
    )
}

#[tokio::test]
async fn search_uses_bearer_auth_and_tv_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/tv"))
        .and(header("authorization", "Bearer read-token"))
        .and(query_param("query", "breaking bad"))
        .and(query_param("page", "1"))
        .and(query_param("language", "en-US"))
        .and(query_param("include_adult", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "results": [
                {
                    "id": 1396,
                    "name": "Breaking Bad",
                    "first_air_date": "2008-01-20",
                    "poster_path": "/ggFHVNu6YYI5L9pCfOacjizRGt.jpg"
                }
            ],
            "total_pages": 1,
            "total_results": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tmdb = client(&server);
    assert_eq!(tmdb.kind(), ProviderKind::Tmdb);
    let set = tmdb
        .search(" breaking bad ", 1, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(set.total_results, 1);
    assert_eq!(set.items[0].id, "1396");
    assert_eq!(set.items[0].title, "Breaking Bad");
    assert!(set.items[0].poster_url.as_ref().unwrap().contains("/w342/"));
}

#[tokio::test]
async fn short_queries_never_hit_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let tmdb = client(&server);
    for query in ["", "x", " x "] {
        let set = tmdb.search(query, 1, &CancellationToken::new()).await.unwrap();
        assert_eq!(set, SearchResultSet::empty());
    }
}

#[tokio::test]
async fn no_matches_is_an_empty_set() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/tv"))
        .and(query_param("query", "xyzzynoresults123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "results": [],
            "total_pages": 1,
            "total_results": 0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let set = client(&server)
        .search("xyzzynoresults123", 1, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(set, SearchResultSet::empty());
}

#[tokio::test]
async fn non_success_status_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/tv"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
        .mount(&server)
        .await;

    let err = client(&server)
        .search("breaking", 1, &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert!(err.to_string().contains("TMDB error 401"));
    assert!(err.to_string().contains("Invalid API key"));
}

#[tokio::test]
async fn details_by_numeric_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tv/1396"))
        .and(query_param("language", "en-US"))
        .and(query_param("append_to_response", "credits"))
        .and(header("authorization", "Bearer read-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1396,
            "name": "Breaking Bad",
            "overview": "Walter White, a New Mexico chemistry teacher...",
            "first_air_date": "2008-01-20",
            "number_of_seasons": 5,
            "genres": [{ "id": 18, "name": "Drama" }],
            "poster_path": null,
            "credits": { "cast": [{ "name": "Bryan Cranston" }] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tmdb = client(&server).with_append_to_response("credits");
    let details = tmdb
        .get_details("1396", &CancellationToken::new())
        .await
        .unwrap();
    let info = details.info().unwrap();
    assert_eq!(info.total_seasons, Some(5));
    assert_eq!(info.poster_url, None);
    assert_eq!(info.cast.as_deref(), Some(&["Bryan Cranston".to_string()][..]));
}

#[tokio::test]
async fn unknown_id_is_business_error_with_provider_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tv/999999999"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "status_code": 34,
            "status_message": "The resource you requested could not be found."
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .get_details("999999999", &CancellationToken::new())
        .await
        .unwrap_err();
    match err {
        ProviderError::Business(message) => {
            assert_eq!(message, "The resource you requested could not be found.")
        }
        other => panic!("expected business error, got {other:?}"),
    }
}

#[tokio::test]
async fn invalid_ids_fail_before_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let tmdb = client(&server);
    for id in ["", "0", "tt0903747"] {
        let err = tmdb
            .get_details(id, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidArgument(_)), "id {id:?}");
    }
}
