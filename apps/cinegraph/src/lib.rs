//! # Cinegraph - Film Knowledge Base Gateway (THE BINARY)
//!
//! Library surface of the binary crate, exposing the HTTP API, the catalog
//! aggregation layer, the endpoint client, the configuration loader, and the
//! CLI so integration tests can drive them directly.
//!
//! All query composition and result shaping lives in `cinegraph-core`; this
//! crate owns I/O only: HTTP in, HTTP out, configuration, and terminal
//! output.

pub mod api;
pub mod catalog;
pub mod cli;
pub mod client;
pub mod config;
