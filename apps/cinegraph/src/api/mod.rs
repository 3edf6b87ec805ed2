//! # Cinegraph HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /api/home` - Home page rails (works and directors)
//! - `GET /api/works/{class}` - Full listing for a work class
//! - `GET /api/works/{class}/{name}` - Work detail with cast
//! - `GET /api/characters` - Character roster
//! - `GET /api/characters/{name}` - Character detail
//! - `GET /api/directors` - Director roster
//! - `GET /api/directors/{name}` - Director detail
//! - `GET /api/search?q=term` - Cross-type search
//! - `GET /image?url=...` - Remote image relay
//!
//! All configuration comes from the [`Config`] handed to [`create_router`];
//! nothing here reads the environment.

mod handlers;
mod middleware;
mod relay;

pub use middleware::create_rate_limiter;

use crate::catalog::Catalog;
use crate::config::Config;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::get,
};
use cinegraph_core::CinegraphError;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state.
#[derive(Clone)]
pub struct AppState {
    /// The catalog aggregation layer.
    pub catalog: Arc<Catalog>,
    /// HTTP client used by the image relay. Certificate verification stays
    /// on; an upstream with a bad certificate is a relay failure.
    pub relay_http: reqwest::Client,
}

impl AppState {
    pub fn new(catalog: Catalog) -> Result<Self, CinegraphError> {
        let relay_http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| CinegraphError::Config(format!("relay client: {e}")))?;
        Ok(Self {
            catalog: Arc::new(catalog),
            relay_http,
        })
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build the CORS layer from configured origins.
///
/// - `["*"]`: allows all origins (development mode)
/// - empty: localhost only (restrictive default)
/// - otherwise: exactly the listed origins
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS: allowing ALL origins. This is insecure for production!");
        return CorsLayer::permissive();
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| {
            let trimmed = o.trim();
            match trimmed.parse::<HeaderValue>() {
                Ok(hv) => {
                    tracing::info!("CORS: allowing origin: {}", trimmed);
                    Some(hv)
                }
                Err(e) => {
                    tracing::warn!("CORS: invalid origin '{}': {}", trimmed, e);
                    None
                }
            }
        })
        .collect();

    if parsed.is_empty() {
        tracing::info!("CORS: no origins configured, defaulting to localhost only");
        return build_localhost_cors();
    }

    CorsLayer::new()
        .allow_origin(parsed)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

/// Restrictive CORS layer allowing only localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let localhost_origins = vec![
        "http://localhost:3000".parse::<HeaderValue>().ok(),
        "http://localhost:8080".parse::<HeaderValue>().ok(),
        "http://127.0.0.1:3000".parse::<HeaderValue>().ok(),
        "http://127.0.0.1:8080".parse::<HeaderValue>().ok(),
    ];
    let origins: Vec<HeaderValue> = localhost_origins.into_iter().flatten().collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Rate limiting - if enabled in config
pub fn create_router(state: AppState, config: &Config) -> Router {
    let cors = build_cors_layer(&config.server.cors_origins);

    let rate_limiter = if config.server.rate_limit > 0 {
        tracing::info!(
            "Rate limiting enabled: {} requests/second",
            config.server.rate_limit
        );
        Some(create_rate_limiter(config.server.rate_limit))
    } else {
        tracing::info!("Rate limiting disabled");
        None
    };

    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/api/home", get(handlers::home_handler))
        .route("/api/works/{class}", get(handlers::listing_handler))
        .route("/api/works/{class}/{name}", get(handlers::work_handler))
        .route("/api/characters", get(handlers::characters_handler))
        .route("/api/characters/{name}", get(handlers::character_handler))
        .route("/api/directors", get(handlers::directors_handler))
        .route("/api/directors/{name}", get(handlers::director_handler))
        .route("/api/search", get(handlers::search_handler))
        .route(config.assets.relay_path.as_str(), get(relay::relay_handler));

    if let Some(limiter) = rate_limiter {
        router = router.layer(axum_middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    }

    router
        .layer(axum::extract::DefaultBodyLimit::max(1024 * 1024))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server.
pub async fn run_server(config: &Config, catalog: Catalog) -> Result<(), CinegraphError> {
    let state = AppState::new(catalog)?;
    let router = create_router(state, config);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| CinegraphError::Io(format!("bind failed: {e}")))?;

    tracing::info!("Cinegraph HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .await
        .map_err(|e| CinegraphError::Io(format!("server error: {e}")))
}
