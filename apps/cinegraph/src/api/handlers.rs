//! # API Endpoint Handlers
//!
//! Thin translation from HTTP to the catalog and back. Every handler returns
//! a JSON body; failures map onto the status grid below.
//!
//! | Error                       | Status |
//! |-----------------------------|--------|
//! | `NotFound`                  | 404    |
//! | `Transport`                 | 502    |
//! | `MalformedResponse`         | 502    |
//! | `InvalidImageSource`        | 400    |
//! | unknown class slug          | 404    |
//! | missing or empty `q`        | 400    |

use super::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cinegraph_core::{CinegraphError, WorkClass};
use serde::{Deserialize, Serialize};

// =============================================================================
// ERROR MAPPING
// =============================================================================

/// JSON error body: `{"error": "..."}`.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Wrapper turning a [`CinegraphError`] into an HTTP response, so handlers
/// can use `?` on catalog calls.
pub struct ApiError(CinegraphError);

impl From<CinegraphError> for ApiError {
    fn from(err: CinegraphError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            CinegraphError::NotFound => StatusCode::NOT_FOUND,
            CinegraphError::Transport(_) | CinegraphError::MalformedResponse(_) => {
                StatusCode::BAD_GATEWAY
            }
            CinegraphError::InvalidImageSource(_) => StatusCode::BAD_REQUEST,
            CinegraphError::Config(_) | CinegraphError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        (
            status,
            Json(ErrorBody {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

fn not_found(what: &str) -> ApiError {
    tracing::debug!("{what} not recognized");
    ApiError(CinegraphError::NotFound)
}

// =============================================================================
// HEALTH HANDLER
// =============================================================================

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// =============================================================================
// CATALOG HANDLERS
// =============================================================================

/// Home page rails.
pub async fn home_handler(State(state): State<AppState>) -> Result<Response, ApiError> {
    Ok(Json(state.catalog.home().await?).into_response())
}

/// Full listing for one work class.
pub async fn listing_handler(
    State(state): State<AppState>,
    Path(class): Path<String>,
) -> Result<Response, ApiError> {
    let class = WorkClass::from_slug(&class).ok_or_else(|| not_found("work class"))?;
    Ok(Json(state.catalog.listing(class).await?).into_response())
}

/// Work detail with cast. The name match is a case-insensitive substring.
pub async fn work_handler(
    State(state): State<AppState>,
    Path((class, name)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let class = WorkClass::from_slug(&class).ok_or_else(|| not_found("work class"))?;
    Ok(Json(state.catalog.work_detail(class, &name).await?).into_response())
}

/// Character roster.
pub async fn characters_handler(State(state): State<AppState>) -> Result<Response, ApiError> {
    Ok(Json(state.catalog.characters().await?).into_response())
}

/// Character detail with co-characters.
pub async fn character_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    Ok(Json(state.catalog.character_detail(&name).await?).into_response())
}

/// Director roster.
pub async fn directors_handler(State(state): State<AppState>) -> Result<Response, ApiError> {
    Ok(Json(state.catalog.directors().await?).into_response())
}

/// Director detail with filmography.
pub async fn director_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    Ok(Json(state.catalog.director_detail(&name).await?).into_response())
}

// =============================================================================
// SEARCH HANDLER
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    q: Option<String>,
}

/// Cross-type search. A missing or blank term is the caller's error, not an
/// empty result set.
pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Response, ApiError> {
    let term = params.q.as_deref().map(str::trim).unwrap_or_default();
    if term.is_empty() {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                error: "search term must not be empty".to_string(),
            }),
        )
            .into_response());
    }
    Ok(Json(state.catalog.search(term).await?).into_response())
}
