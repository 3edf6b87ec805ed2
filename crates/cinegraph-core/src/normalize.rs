//! # Result Normalization
//!
//! Turns raw result rows into typed records, deduplicated by primary key.
//!
//! The rules, in order:
//!
//! 1. Rows are grouped by primary key in first-seen order.
//! 2. Single-valued fields take the first non-absent occurrence in the
//!    group; a later row never overwrites a populated field with absence.
//! 3. Multi-valued fields (genre) accumulate distinct non-empty values.
//! 4. Lookups return the **first** group in response order. Substring
//!    filters can legitimately match several keys; the front-most-row-wins
//!    tie-break is deliberate and deterministic, not an iteration accident.
//!
//! Zero rows normalize to an empty vec (listings) or
//! [`CinegraphError::NotFound`] (lookups), never a panic.

use crate::response::Row;
use crate::types::{
    CharacterRecord, CinegraphError, DirectorRecord, ListingEntry, Work, WorkClass, WorkCommon,
};

// =============================================================================
// GROUPING PRIMITIVES
// =============================================================================

/// Group rows by the value bound to `key`, preserving first-seen order of
/// keys and of rows within each group. Rows lacking the key are dropped.
fn group_by<'a>(rows: &'a [Row], key: &str) -> Vec<(&'a str, Vec<&'a Row>)> {
    let mut groups: Vec<(&str, Vec<&Row>)> = Vec::new();
    for row in rows {
        let Some(k) = row.get(key) else { continue };
        match groups.iter_mut().find(|(existing, _)| *existing == k) {
            Some((_, members)) => members.push(row),
            None => groups.push((k, vec![row])),
        }
    }
    groups
}

/// First non-absent, non-empty value of `var` across the group.
fn first_value(group: &[&Row], var: &str) -> Option<String> {
    group
        .iter()
        .find_map(|row| row.get(var).filter(|v| !v.is_empty()))
        .map(str::to_string)
}

/// Distinct non-empty values of `var` across the group, first-seen order.
fn collect_distinct(group: &[&Row], var: &str) -> Vec<String> {
    let mut values: Vec<String> = Vec::new();
    for row in group {
        if let Some(v) = row.get(var)
            && !v.is_empty()
            && !values.iter().any(|seen| seen == v)
        {
            values.push(v.to_string());
        }
    }
    values
}

// =============================================================================
// WORK NORMALIZATION
// =============================================================================

fn work_from_group(class: WorkClass, title: &str, group: &[&Row]) -> Work {
    let common = WorkCommon {
        title: title.to_string(),
        release_year: first_value(group, "releaseYear"),
        description: first_value(group, "description"),
        poster_url: first_value(group, "posterURL"),
        director: first_value(group, "directorName"),
        genres: collect_distinct(group, "genre"),
    };
    match class {
        WorkClass::Film => Work::Film {
            common,
            duration: first_value(group, "duration"),
            synopsis: first_value(group, "synopsis"),
        },
        WorkClass::Series => Work::Series {
            common,
            plot: first_value(group, "plot"),
            episodes: first_value(group, "episodes"),
            studio: first_value(group, "studio"),
        },
        WorkClass::ShortFilm => Work::ShortFilm { common },
    }
}

/// Normalize listing or lookup rows into one work per unique title.
#[must_use]
pub fn collect_works(rows: &[Row], class: WorkClass) -> Vec<Work> {
    group_by(rows, "title")
        .iter()
        .map(|(title, group)| work_from_group(class, title, group))
        .collect()
}

/// Lookup normalization: first group wins, zero groups is `NotFound`.
pub fn lookup_work(rows: &[Row], class: WorkClass) -> Result<Work, CinegraphError> {
    collect_works(rows, class)
        .into_iter()
        .next()
        .ok_or(CinegraphError::NotFound)
}

/// Normalize listing rows into grid-card entries, one per unique title.
#[must_use]
pub fn collect_listing(rows: &[Row]) -> Vec<ListingEntry> {
    group_by(rows, "title")
        .iter()
        .map(|(title, group)| ListingEntry {
            title: (*title).to_string(),
            release_year: first_value(group, "releaseYear"),
            poster_url: first_value(group, "posterURL"),
        })
        .collect()
}

// =============================================================================
// CHARACTER NORMALIZATION
// =============================================================================

fn character_from_group(name: &str, group: &[&Row]) -> CharacterRecord {
    CharacterRecord {
        name: name.to_string(),
        age: first_value(group, "age"),
        gender: first_value(group, "gender"),
        image_url: first_value(group, "imageURL"),
        description: first_value(group, "description"),
    }
}

/// Normalize character rows keyed by `?name`.
#[must_use]
pub fn collect_characters(rows: &[Row]) -> Vec<CharacterRecord> {
    group_by(rows, "name")
        .iter()
        .map(|(name, group)| character_from_group(name, group))
        .collect()
}

/// Normalize sibling-character rows, which bind `?characterName` instead of
/// `?name`.
#[must_use]
pub fn collect_sibling_characters(rows: &[Row]) -> Vec<CharacterRecord> {
    group_by(rows, "characterName")
        .iter()
        .map(|(name, group)| character_from_group(name, group))
        .collect()
}

/// Character lookup: first group wins, zero groups is `NotFound`.
pub fn lookup_character(rows: &[Row]) -> Result<CharacterRecord, CinegraphError> {
    collect_characters(rows)
        .into_iter()
        .next()
        .ok_or(CinegraphError::NotFound)
}

// =============================================================================
// DIRECTOR NORMALIZATION
// =============================================================================

/// Normalize director rows keyed by `?name`.
#[must_use]
pub fn collect_directors(rows: &[Row]) -> Vec<DirectorRecord> {
    group_by(rows, "name")
        .iter()
        .map(|(name, group)| DirectorRecord {
            name: (*name).to_string(),
            born: first_value(group, "born"),
            birth_year: first_value(group, "birthYear"),
            nationality: first_value(group, "nationality"),
            description: first_value(group, "description"),
            biography: first_value(group, "history"),
            image_url: first_value(group, "imageURL"),
        })
        .collect()
}

/// Director lookup: first group wins, zero groups is `NotFound`.
pub fn lookup_director(rows: &[Row]) -> Result<DirectorRecord, CinegraphError> {
    collect_directors(rows)
        .into_iter()
        .next()
        .ok_or(CinegraphError::NotFound)
}

// =============================================================================
// TESTS
// =============================================================================
