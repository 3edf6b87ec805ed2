//! # Cinegraph - Film Knowledge Base Gateway
//!
//! The main binary for the Cinegraph query gateway.
//!
//! This application provides:
//! - HTTP REST API server (axum-based) over a remote film knowledge base
//! - CLI interface for search, lookup, and listing operations
//! - Same-origin image relay for remote artwork
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                  apps/cinegraph (THE BINARY)                 │
//! │                                                              │
//! │  ┌──────────┐   ┌───────────┐   ┌─────────┐   ┌──────────┐  │
//! │  │   CLI    │   │  HTTP API │   │ Catalog │   │ Endpoint │  │
//! │  │  (clap)  │   │  (axum)   │   │ fan-out │   │  client  │  │
//! │  └────┬─────┘   └─────┬─────┘   └────┬────┘   └────┬─────┘  │
//! │       │               │              │             │        │
//! │       └───────────────┴──────┬───────┴─────────────┘        │
//! │                              ▼                              │
//! │                    ┌──────────────────┐                     │
//! │                    │  cinegraph-core  │                     │
//! │                    │   (THE LOGIC)    │                     │
//! │                    └──────────────────┘                     │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! cinegraph server --host 0.0.0.0 --port 8080
//!
//! # CLI operations
//! cinegraph search totoro
//! cinegraph lookup film "Princess Mononoke"
//! cinegraph list director
//! ```

use cinegraph::cli;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // Initialize tracing — CINEGRAPH_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("CINEGRAPH_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cinegraph=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    // Parse CLI arguments
    let args = cli::Cli::parse();

    // Display startup banner
    if !args.quiet {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(args).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Cinegraph startup banner.
fn print_banner() {
    println!(
        r#"
   ██████╗██╗███╗   ██╗███████╗ ██████╗ ██████╗  █████╗ ██████╗ ██╗  ██╗
  ██╔════╝██║████╗  ██║██╔════╝██╔════╝ ██╔══██╗██╔══██╗██╔══██╗██║  ██║
  ██║     ██║██╔██╗ ██║█████╗  ██║  ███╗██████╔╝███████║██████╔╝███████║
  ██║     ██║██║╚██╗██║██╔══╝  ██║   ██║██╔══██╗██╔══██║██╔═══╝ ██╔══██║
  ╚██████╗██║██║ ╚████║███████╗╚██████╔╝██║  ██║██║  ██║██║     ██║  ██║
   ╚═════╝╚═╝╚═╝  ╚═══╝╚══════╝ ╚═════╝ ╚═╝  ╚═╝╚═╝  ╚═╝╚═╝     ╚═╝  ╚═╝

  Film Knowledge Base Gateway v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
