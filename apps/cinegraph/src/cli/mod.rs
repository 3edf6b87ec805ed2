//! # Cinegraph CLI Module
//!
//! This module implements the CLI interface for Cinegraph.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `home` - Show the home page rails
//! - `search` - Cross-type search against the knowledge base
//! - `lookup` - Look up a single film, series, short, character, or director
//! - `list` - List every entity of one class

mod commands;

use clap::{Parser, Subcommand};
use cinegraph_core::CinegraphError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Cinegraph - Film Knowledge Base Gateway
///
/// Composes graph queries against a remote film knowledge base and serves
/// the normalized results over HTTP and on the command line.
#[derive(Parser, Debug)]
#[command(name = "cinegraph")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to (overrides config)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show the home page rails
    Home,

    /// Search across films, series, shorts, characters, and directors
    Search {
        /// The search term (case-insensitive substring)
        term: String,
    },

    /// Look up a single entity
    Lookup {
        /// Entity class (film, series, short, character, director)
        class: String,

        /// Entity name (case-insensitive substring)
        name: String,
    },

    /// List every entity of one class
    List {
        /// Entity class (film, series, short, character, director)
        class: String,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), CinegraphError> {
    let config = crate::config::Config::load(cli.config.as_deref())?;
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Server { host, port }) => cmd_server(config, host, port).await,
        Some(Commands::Search { term }) => cmd_search(&config, &term, json_mode).await,
        Some(Commands::Lookup { class, name }) => {
            cmd_lookup(&config, &class, &name, json_mode).await
        }
        Some(Commands::List { class }) => cmd_list(&config, &class, json_mode).await,
        // No subcommand - show the home rails by default
        Some(Commands::Home) | None => cmd_home(&config, json_mode).await,
    }
}
