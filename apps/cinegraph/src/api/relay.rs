//! # Image relay
//!
//! Same-origin relay for remote images. The browser asks this process for
//! `GET /image?url=...`; the process fetches the remote image and streams the
//! bytes back with the upstream content type. Remote image hosts never see
//! the browser, and mixed-content rules never block the page.
//!
//! The `url` parameter is opaque here: this endpoint accepts any absolute
//! http(s) URL and does not validate that it points at an image.

use super::AppState;
use axum::{
    body::Body,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use cinegraph_core::CinegraphError;
use std::collections::HashMap;

/// Relay one remote image.
///
/// - no `url` parameter: 404, matching the asset-not-found contract
/// - unparseable or non-http(s) URL: 400
/// - upstream unreachable or non-success: 502
pub async fn relay_handler(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let Some(raw) = params.get("url") else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let target = match url::Url::parse(raw) {
        Ok(u) if matches!(u.scheme(), "http" | "https") => u,
        Ok(u) => {
            let err =
                CinegraphError::InvalidImageSource(format!("unsupported scheme '{}'", u.scheme()));
            tracing::debug!(error = %err, "relay rejected URL");
            return (StatusCode::BAD_REQUEST, err.to_string()).into_response();
        }
        Err(e) => {
            let err = CinegraphError::InvalidImageSource(e.to_string());
            tracing::debug!(error = %err, "relay rejected URL");
            return (StatusCode::BAD_REQUEST, err.to_string()).into_response();
        }
    };

    let upstream = match state.relay_http.get(target.clone()).send().await {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(url = %target, error = %e, "relay fetch failed");
            return (StatusCode::BAD_GATEWAY, "upstream fetch failed").into_response();
        }
    };

    if !upstream.status().is_success() {
        tracing::warn!(url = %target, status = %upstream.status(), "relay upstream error");
        return (StatusCode::BAD_GATEWAY, "upstream fetch failed").into_response();
    }

    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    let body = Body::from_stream(upstream.bytes_stream());
    ([(header::CONTENT_TYPE, content_type)], body).into_response()
}
