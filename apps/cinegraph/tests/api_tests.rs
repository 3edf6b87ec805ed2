//! Integration tests for the Cinegraph HTTP API.
//!
//! Uses axum-test to drive the handlers without a real server, and mockito to
//! stand in for the remote query endpoint. Every SELECT arrives as a
//! form-encoded POST, so mocks discriminate on distinctive tokens in the
//! encoded query text.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use axum_test::TestServer;
use cinegraph::api::{AppState, create_router};
use cinegraph::catalog::Catalog;
use cinegraph::client::EndpointClient;
use cinegraph::config::Config;
use mockito::{Matcher, ServerGuard};
use serde_json::{Value, json};
use std::time::Duration;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Create a test server wired to a mock endpoint.
async fn create_test_server() -> (TestServer, ServerGuard) {
    let endpoint = mockito::Server::new_async().await;

    let mut config = Config::default();
    config.endpoint.url = endpoint.url();

    let client = EndpointClient::new(&config.endpoint.url, Duration::from_secs(2)).unwrap();
    let catalog = Catalog::new(client, config.image_resolver());
    let state = AppState::new(catalog).unwrap();
    let router = create_router(state, &config);

    (TestServer::new(router).unwrap(), endpoint)
}

/// Wrap variable/value pairs into the endpoint's JSON results shape.
fn bindings(rows: &[&[(&str, &str)]]) -> String {
    let rows: Vec<Value> = rows
        .iter()
        .map(|pairs| {
            let mut obj = serde_json::Map::new();
            for (var, value) in *pairs {
                obj.insert((*var).to_string(), json!({ "value": value }));
            }
            Value::Object(obj)
        })
        .collect();
    json!({ "results": { "bindings": rows } }).to_string()
}

// =============================================================================
// HEALTH
// =============================================================================

#[tokio::test]
async fn health_reports_ok() {
    let (server, _endpoint) = create_test_server().await;

    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
}

// =============================================================================
// SEARCH
// =============================================================================

#[tokio::test]
async fn search_preserves_endpoint_order_and_picks_type_images() {
    let (server, mut endpoint) = create_test_server().await;

    // The five-way union is the only query binding ?typeOrder.
    let _mock = endpoint
        .mock("POST", "/")
        .match_body(Matcher::Regex("typeOrder".to_string()))
        .with_header("content-type", "application/json")
        .with_body(bindings(&[
            &[
                ("type", "Film"),
                ("title", "Ponyo"),
                ("releaseYear", "2008"),
                ("posterURL", "http://img.example/ponyo.jpg"),
            ],
            &[
                ("type", "Director"),
                ("title", "Hayao Miyazaki"),
                ("releaseYear", ""),
                ("imageURL", "http://img.example/miyazaki.jpg"),
            ],
        ]))
        .create_async()
        .await;

    let response = server.get("/api/search").add_query_param("q", "miya").await;
    response.assert_status_ok();

    let hits: Vec<Value> = response.json();
    assert_eq!(hits.len(), 2);

    // Endpoint order is final: the film stays ahead of the director.
    assert_eq!(hits[0]["class"], "Film");
    assert_eq!(hits[0]["title"], "Ponyo");
    assert_eq!(hits[0]["release_year"], "2008");
    assert_eq!(hits[1]["class"], "Director");
    assert!(hits[1]["release_year"].is_null());

    // Both images relay the remote URL through the same-origin endpoint.
    assert_eq!(hits[0]["image"]["kind"], "relay");
    let src = hits[0]["image"]["src"].as_str().unwrap();
    assert!(src.starts_with("/image?url=http%3A%2F%2F"));
    assert_eq!(hits[1]["image"]["kind"], "relay");
}

#[tokio::test]
async fn search_without_term_is_bad_request() {
    let (server, _endpoint) = create_test_server().await;

    let response = server.get("/api/search").await;
    response.assert_status_bad_request();

    let response = server.get("/api/search").add_query_param("q", "   ").await;
    response.assert_status_bad_request();
}

// =============================================================================
// WORK DETAIL
// =============================================================================

#[tokio::test]
async fn work_detail_merges_genres_and_resolves_images() {
    let (server, mut endpoint) = create_test_server().await;

    // Film lookup selects ?synopsis; the cast query selects ?characterName.
    let _detail = endpoint
        .mock("POST", "/")
        .match_body(Matcher::Regex("synopsis".to_string()))
        .with_header("content-type", "application/json")
        .with_body(bindings(&[
            &[
                ("title", "Princess Mononoke"),
                ("releaseYear", "1997"),
                ("directorName", "Hayao Miyazaki"),
                ("genre", "Adventure"),
            ],
            &[
                ("title", "Princess Mononoke"),
                ("releaseYear", "1997"),
                ("genre", "Fantasy"),
            ],
        ]))
        .create_async()
        .await;
    let _cast = endpoint
        .mock("POST", "/")
        .match_body(Matcher::Regex("hasCharacter".to_string()))
        .with_header("content-type", "application/json")
        .with_body(bindings(&[
            &[("characterName", "San")],
            &[
                ("characterName", "Ashitaka"),
                ("imageURL", "http://img.example/ashitaka.jpg"),
            ],
        ]))
        .create_async()
        .await;

    let response = server.get("/api/works/film/mononoke").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["class"], "film");
    assert_eq!(body["title"], "Princess Mononoke");
    assert_eq!(body["genres"], json!(["Adventure", "Fantasy"]));
    assert_eq!(body["director"], "Hayao Miyazaki");

    // No remote poster: the curated hero asset backs both slots.
    assert_eq!(body["hero"]["kind"], "curated");
    assert_eq!(body["hero"]["src"], "/assets/hero/mononoke.jpg");
    assert_eq!(body["poster"]["kind"], "curated");

    let cast: Vec<Value> = body["characters"].as_array().unwrap().clone();
    assert_eq!(cast.len(), 2);
    assert_eq!(cast[0]["name"], "San");
    assert_eq!(cast[0]["image"]["kind"], "placeholder");
    assert_eq!(cast[1]["image"]["kind"], "relay");
}

#[tokio::test]
async fn unknown_work_is_not_found() {
    let (server, mut endpoint) = create_test_server().await;

    let _mock = endpoint
        .mock("POST", "/")
        .with_header("content-type", "application/json")
        .with_body(bindings(&[]))
        .create_async()
        .await;

    let response = server.get("/api/works/film/nonexistent").await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn unknown_class_slug_is_not_found() {
    let (server, _endpoint) = create_test_server().await;

    let response = server.get("/api/works/documentary").await;
    response.assert_status_not_found();
}

// =============================================================================
// ENDPOINT FAILURES
// =============================================================================

#[tokio::test]
async fn endpoint_error_status_is_bad_gateway() {
    let (server, mut endpoint) = create_test_server().await;

    let _mock = endpoint
        .mock("POST", "/")
        .with_status(500)
        .create_async()
        .await;

    let response = server.get("/api/works/film/ponyo").await;
    response.assert_status(axum::http::StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn non_object_payload_is_bad_gateway() {
    let (server, mut endpoint) = create_test_server().await;

    let _mock = endpoint
        .mock("POST", "/")
        .with_header("content-type", "application/json")
        .with_body("[1, 2, 3]")
        .create_async()
        .await;

    let response = server.get("/api/works/film/ponyo").await;
    response.assert_status(axum::http::StatusCode::BAD_GATEWAY);
}

// =============================================================================
// HOME
// =============================================================================

#[tokio::test]
async fn home_returns_all_rails() {
    let (server, mut endpoint) = create_test_server().await;

    // One catch-all response serves all four rail queries: work rails group
    // on ?title, the director strip on ?name, and rows missing the key
    // variable are dropped per rail.
    let _mock = endpoint
        .mock("POST", "/")
        .with_header("content-type", "application/json")
        .with_body(bindings(&[
            &[("title", "Ponyo"), ("releaseYear", "2008")],
            &[("name", "Isao Takahata")],
        ]))
        .expect_at_least(4)
        .create_async()
        .await;

    let response = server.get("/api/home").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["films"][0]["title"], "Ponyo");
    assert_eq!(body["series"][0]["title"], "Ponyo");
    assert_eq!(body["short_films"][0]["title"], "Ponyo");
    assert_eq!(body["directors"][0]["name"], "Isao Takahata");
}
