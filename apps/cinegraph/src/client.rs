//! # Endpoint client
//!
//! Thin HTTP wrapper around the remote graph-query service. One method:
//! submit a query, get parsed rows back. Query text is composed upstream in
//! `cinegraph-core`; result shaping happens downstream there too. This module
//! only moves bytes.

use cinegraph_core::{CinegraphError, Row, parse_rows};
use std::time::Duration;

// =============================================================================
// CLIENT
// =============================================================================

#[derive(Debug, Clone)]
pub struct EndpointClient {
    http: reqwest::Client,
    url: String,
}

impl EndpointClient {
    /// Build a client for the given endpoint with an explicit timeout.
    /// A request that outlives the timeout is a transport error, never a
    /// hang and never an empty result.
    pub fn new(url: &str, timeout: Duration) -> Result<Self, CinegraphError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CinegraphError::Config(format!("http client: {e}")))?;
        Ok(Self {
            http,
            url: url.to_string(),
        })
    }

    /// Submit a SELECT query as a form-encoded POST and parse the JSON
    /// results. Non-success statuses and connection failures are transport
    /// errors; an unparseable body is a malformed-response error.
    pub async fn select(&self, query: &str) -> Result<Vec<Row>, CinegraphError> {
        tracing::debug!(endpoint = %self.url, bytes = query.len(), "dispatching query");

        let response = self
            .http
            .post(&self.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[("query", query)])
            .send()
            .await
            .map_err(|e| CinegraphError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CinegraphError::Transport(format!(
                "endpoint returned {status}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| CinegraphError::Transport(e.to_string()))?;
        parse_rows(&body)
    }
}
