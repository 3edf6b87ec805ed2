//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands. Every
//! command builds a catalog from the loaded configuration and talks to the
//! remote endpoint; there is no local state.

use crate::api;
use crate::catalog::Catalog;
use crate::client::EndpointClient;
use crate::config::Config;
use cinegraph_core::{CinegraphError, EntityClass, ImageSource, WorkClass};
use serde::Serialize;
use std::time::Duration;

/// Build the catalog from configuration.
fn build_catalog(config: &Config) -> Result<Catalog, CinegraphError> {
    let client = EndpointClient::new(
        &config.endpoint.url,
        Duration::from_secs(config.endpoint.timeout_secs),
    )?;
    Ok(Catalog::new(client, config.image_resolver()))
}

fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_default()
    );
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(
    mut config: Config,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), CinegraphError> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    let catalog = build_catalog(&config)?;

    println!("Cinegraph Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:     {}", config.server.host);
    println!("  Port:     {}", config.server.port);
    println!("  Endpoint: {}", config.endpoint.url);
    println!();
    println!("Endpoints:");
    println!("  GET /api/home                 - Home page rails");
    println!("  GET /api/works/{{class}}        - Work listing");
    println!("  GET /api/works/{{class}}/{{name}} - Work detail");
    println!("  GET /api/characters[/{{name}}]  - Characters");
    println!("  GET /api/directors[/{{name}}]   - Directors");
    println!("  GET /api/search?q=term        - Cross-type search");
    println!("  GET {}?url=...           - Image relay", config.assets.relay_path);
    println!("  GET /health                   - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    api::run_server(&config, catalog).await
}

// =============================================================================
// HOME COMMAND
// =============================================================================

/// Show the home page rails.
pub async fn cmd_home(config: &Config, json_mode: bool) -> Result<(), CinegraphError> {
    let catalog = build_catalog(config)?;
    let home = catalog.home().await?;

    if json_mode {
        print_json(&home);
        return Ok(());
    }

    println!("Cinegraph Home");
    println!("==============");
    print_rail("Latest Films", home.films.iter().map(|c| card_line(&c.title, c.release_year.as_deref())));
    print_rail("Latest Series", home.series.iter().map(|c| card_line(&c.title, c.release_year.as_deref())));
    print_rail("Latest Short Films", home.short_films.iter().map(|c| card_line(&c.title, c.release_year.as_deref())));
    print_rail("Directors", home.directors.iter().map(|d| d.name.clone()));
    Ok(())
}

fn card_line(title: &str, year: Option<&str>) -> String {
    match year {
        Some(y) if !y.is_empty() => format!("{title} ({y})"),
        _ => title.to_string(),
    }
}

fn print_rail(heading: &str, lines: impl Iterator<Item = String>) {
    println!();
    println!("{heading}:");
    let mut empty = true;
    for line in lines {
        println!("  {line}");
        empty = false;
    }
    if empty {
        println!("  (none)");
    }
}

// =============================================================================
// SEARCH COMMAND
// =============================================================================

/// Cross-type search.
pub async fn cmd_search(config: &Config, term: &str, json_mode: bool) -> Result<(), CinegraphError> {
    let trimmed = term.trim();
    if trimmed.is_empty() {
        return Err(CinegraphError::Config(
            "search term must not be empty".to_string(),
        ));
    }
    let catalog = build_catalog(config)?;
    let results = catalog.search(trimmed).await?;

    if json_mode {
        print_json(&results);
        return Ok(());
    }

    if results.is_empty() {
        println!("No results for \"{trimmed}\"");
        return Ok(());
    }
    println!("Results for \"{trimmed}\":");
    for hit in &results {
        println!(
            "  [{:<10}] {}",
            hit.class.label(),
            card_line(&hit.title, hit.release_year.as_deref())
        );
    }
    Ok(())
}

// =============================================================================
// LOOKUP COMMAND
// =============================================================================

/// Look up a single entity by class slug and name.
pub async fn cmd_lookup(
    config: &Config,
    class: &str,
    name: &str,
    json_mode: bool,
) -> Result<(), CinegraphError> {
    let class = EntityClass::from_slug(class)
        .ok_or_else(|| CinegraphError::Config(format!("unknown class '{class}'")))?;
    let catalog = build_catalog(config)?;

    match class {
        EntityClass::Film | EntityClass::Series | EntityClass::ShortFilm => {
            let work_class = match class {
                EntityClass::Series => WorkClass::Series,
                EntityClass::ShortFilm => WorkClass::ShortFilm,
                _ => WorkClass::Film,
            };
            let detail = catalog.work_detail(work_class, name).await?;
            if json_mode {
                print_json(&detail);
            } else {
                let common = detail.work.common();
                println!("{}", card_line(&common.title, common.release_year.as_deref()));
                if let Some(director) = &common.director {
                    println!("  Directed by {director}");
                }
                if !common.genres.is_empty() {
                    println!("  Genres: {}", common.genres.join(", "));
                }
                if let Some(preview) = &detail.synopsis_preview {
                    let ellipsis = if preview.truncated { "…" } else { "" };
                    println!();
                    println!("{}{}", preview.text, ellipsis);
                }
                if !detail.characters.is_empty() {
                    println!();
                    println!("Characters:");
                    for c in &detail.characters {
                        println!("  {}", c.name);
                    }
                }
            }
        }
        EntityClass::Character => {
            let detail = catalog.character_detail(name).await?;
            if json_mode {
                print_json(&detail);
            } else {
                println!("{}", detail.character.name);
                if let Some(work) = &detail.appears_in {
                    println!("  Appears in {work}");
                }
                if let Some(description) = &detail.character.description {
                    println!();
                    println!("{description}");
                }
            }
        }
        EntityClass::Director => {
            let detail = catalog.director_detail(name).await?;
            if json_mode {
                print_json(&detail);
            } else {
                println!("{}", detail.director.name);
                if let Some(nationality) = &detail.director.nationality {
                    println!("  Nationality: {nationality}");
                }
                if let Some(preview) = &detail.biography_preview {
                    let ellipsis = if preview.truncated { "…" } else { "" };
                    println!();
                    println!("{}{}", preview.text, ellipsis);
                }
                if !detail.works.is_empty() {
                    println!();
                    println!("Filmography:");
                    for w in &detail.works {
                        println!("  {}", card_line(&w.title, w.release_year.as_deref()));
                    }
                }
            }
        }
    }
    Ok(())
}

// =============================================================================
// LIST COMMAND
// =============================================================================

/// List every entity of one class.
pub async fn cmd_list(config: &Config, class: &str, json_mode: bool) -> Result<(), CinegraphError> {
    let class = EntityClass::from_slug(class)
        .ok_or_else(|| CinegraphError::Config(format!("unknown class '{class}'")))?;
    let catalog = build_catalog(config)?;

    match class {
        EntityClass::Film | EntityClass::Series | EntityClass::ShortFilm => {
            let work_class = match class {
                EntityClass::Series => WorkClass::Series,
                EntityClass::ShortFilm => WorkClass::ShortFilm,
                _ => WorkClass::Film,
            };
            let page = catalog.listing(work_class).await?;
            if json_mode {
                print_json(&page);
            } else {
                for entry in &page.entries {
                    println!("{}", card_line(&entry.title, entry.release_year.as_deref()));
                }
            }
        }
        EntityClass::Character => {
            let roster = catalog.characters().await?;
            print_person_roster(&roster, json_mode);
        }
        EntityClass::Director => {
            let roster = catalog.directors().await?;
            print_person_roster(&roster, json_mode);
        }
    }
    Ok(())
}

fn print_person_roster(roster: &[crate::catalog::PersonCard], json_mode: bool) {
    if json_mode {
        print_json(&roster);
        return;
    }
    for person in roster {
        let note = match &person.image {
            ImageSource::Placeholder { .. } => " (no image)",
            _ => "",
        };
        println!("{}{}", person.name, note);
    }
}
