//! Integration tests for the image relay endpoint.
//!
//! The relay endpoint never touches the query endpoint, so these tests only
//! mock the remote image host.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use axum::http::StatusCode;
use axum_test::TestServer;
use cinegraph::api::{AppState, create_router};
use cinegraph::catalog::Catalog;
use cinegraph::client::EndpointClient;
use cinegraph::config::Config;
use std::time::Duration;

/// Create a test server; the query endpoint is never called here.
fn create_test_server() -> TestServer {
    let config = Config::default();
    let client = EndpointClient::new(&config.endpoint.url, Duration::from_secs(2)).unwrap();
    let catalog = Catalog::new(client, config.image_resolver());
    let state = AppState::new(catalog).unwrap();
    TestServer::new(create_router(state, &config)).unwrap()
}

#[tokio::test]
async fn missing_url_param_is_not_found() {
    let server = create_test_server();

    let response = server.get("/image").await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn non_http_scheme_is_rejected() {
    let server = create_test_server();

    let response = server
        .get("/image")
        .add_query_param("url", "ftp://files.example/poster.jpg")
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn unparseable_url_is_rejected() {
    let server = create_test_server();

    let response = server
        .get("/image")
        .add_query_param("url", "not a url at all")
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn relay_streams_upstream_bytes_and_content_type() {
    let server = create_test_server();
    let mut image_host = mockito::Server::new_async().await;

    let image_bytes: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
    let _mock = image_host
        .mock("GET", "/poster.jpg")
        .with_header("content-type", "image/jpeg")
        .with_body(image_bytes)
        .create_async()
        .await;

    let response = server
        .get("/image")
        .add_query_param("url", format!("{}/poster.jpg", image_host.url()))
        .await;
    response.assert_status_ok();
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "image/jpeg"
    );
    assert_eq!(response.as_bytes().as_ref(), image_bytes);
}

#[tokio::test]
async fn upstream_error_is_bad_gateway() {
    let server = create_test_server();
    let mut image_host = mockito::Server::new_async().await;

    let _mock = image_host
        .mock("GET", "/missing.jpg")
        .with_status(404)
        .create_async()
        .await;

    let response = server
        .get("/image")
        .add_query_param("url", format!("{}/missing.jpg", image_host.url()))
        .await;
    response.assert_status(StatusCode::BAD_GATEWAY);
}
