//! # Configuration
//!
//! Explicit configuration for the binary, loaded once at startup and
//! threaded into the endpoint client, the image resolver, and the router at
//! construction time. Nothing reads ambient process state after startup.
//!
//! Sources, later wins: built-in defaults → TOML file (`--config`, or
//! `cinegraph.toml` if present) → `CINEGRAPH_*` environment overrides.

use cinegraph_core::{CinegraphError, ImageResolver};
use serde::Deserialize;
use std::path::Path;

// =============================================================================
// SECTIONS
// =============================================================================

/// `[endpoint]`: the remote graph-query service.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EndpointConfig {
    /// SPARQL query endpoint URL.
    pub url: String,
    /// Explicit request timeout. Expiry is a transport error, distinct from
    /// "no data".
    pub timeout_secs: u64,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:3030/ghibli-dataset/sparql".to_string(),
            timeout_secs: 5,
        }
    }
}

/// `[server]`: bind address and HTTP middleware knobs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Requests per second for the global rate limiter; 0 disables it.
    pub rate_limit: u32,
    /// Allowed CORS origins. Empty means localhost only; `["*"]` allows all.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            rate_limit: 100,
            cors_origins: Vec::new(),
        }
    }
}

/// `[assets]`: relay path and local image assets.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetConfig {
    /// Same-origin path of the image relay endpoint.
    pub relay_path: String,
    /// Directory of curated hero assets.
    pub hero_dir: String,
    /// Generic placeholder image.
    pub placeholder: String,
    /// Fallback hero banner for titles without a curated asset.
    pub hero_fallback: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            relay_path: "/image".to_string(),
            hero_dir: "/assets/hero".to_string(),
            placeholder: "/assets/no-image.png".to_string(),
            hero_fallback: "/assets/default-hero.jpg".to_string(),
        }
    }
}

// =============================================================================
// CONFIG
// =============================================================================

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub endpoint: EndpointConfig,
    pub server: ServerConfig,
    pub assets: AssetConfig,
}

impl Config {
    /// Load configuration.
    ///
    /// With `Some(path)` the file must exist and parse; with `None` a
    /// `cinegraph.toml` in the working directory is used if present,
    /// otherwise defaults apply. Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self, CinegraphError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => {
                let default_path = Path::new("cinegraph.toml");
                if default_path.is_file() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env_overrides();

        if config.endpoint.url.is_empty() {
            return Err(CinegraphError::Config(
                "endpoint.url must not be empty".to_string(),
            ));
        }
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, CinegraphError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            CinegraphError::Io(format!("cannot read config '{}': {}", path.display(), e))
        })?;
        toml::from_str(&raw).map_err(|e| {
            CinegraphError::Config(format!("invalid config '{}': {}", path.display(), e))
        })
    }

    /// `CINEGRAPH_ENDPOINT`, `CINEGRAPH_TIMEOUT_SECS`, `CINEGRAPH_HOST`,
    /// `CINEGRAPH_PORT`, `CINEGRAPH_RATE_LIMIT`.
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("CINEGRAPH_ENDPOINT") {
            self.endpoint.url = url;
        }
        if let Some(secs) = env_parse("CINEGRAPH_TIMEOUT_SECS") {
            self.endpoint.timeout_secs = secs;
        }
        if let Ok(host) = std::env::var("CINEGRAPH_HOST") {
            self.server.host = host;
        }
        if let Some(port) = env_parse("CINEGRAPH_PORT") {
            self.server.port = port;
        }
        if let Some(limit) = env_parse("CINEGRAPH_RATE_LIMIT") {
            self.server.rate_limit = limit;
        }
    }

    /// Build the image resolver from the asset section.
    #[must_use]
    pub fn image_resolver(&self) -> ImageResolver {
        ImageResolver::new(
            self.assets.relay_path.clone(),
            self.assets.hero_dir.clone(),
            self.assets.placeholder.clone(),
            self.assets.hero_fallback.clone(),
        )
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}

// =============================================================================
// TESTS
// =============================================================================
