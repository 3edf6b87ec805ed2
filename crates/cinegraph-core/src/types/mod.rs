//! # Core Type Definitions
//!
//! This module contains all core types for the cinegraph presentation layer:
//! - The closed entity-class set (`EntityClass`, `WorkClass`)
//! - Typed records shaped for rendering (`Work`, `CharacterRecord`,
//!   `DirectorRecord`, `ListingEntry`, `SearchHit`)
//! - Display truncation (`Preview`)
//! - Error types (`CinegraphError`)
//!
//! All records are read-only projections over one query response. Nothing in
//! this module holds state between requests.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// ENTITY CLASSES
// =============================================================================

/// The closed set of queryable entity types.
///
/// Declaration order is the fixed search precedence: Film, Series, ShortFilm,
/// Character, Director. Adding a sixth type is a compile-time-visible change
/// everywhere this enum is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityClass {
    Film,
    Series,
    ShortFilm,
    Character,
    Director,
}

impl EntityClass {
    /// The ontology class this entity type maps to.
    #[must_use]
    pub const fn iri(self) -> &'static str {
        match self {
            Self::Film => "ghibli:Film",
            Self::Series => "ghibli:Series",
            Self::ShortFilm => "ghibli:ShortFilm",
            Self::Character => "ghibli:Character",
            Self::Director => "ghibli:Director",
        }
    }

    /// Display label, also the type tag bound by the search union.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Film => "Film",
            Self::Series => "Series",
            Self::ShortFilm => "Short Film",
            Self::Character => "Character",
            Self::Director => "Director",
        }
    }

    /// URL slug used in routes and CLI arguments.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Film => "film",
            Self::Series => "series",
            Self::ShortFilm => "short",
            Self::Character => "character",
            Self::Director => "director",
        }
    }

    /// Fixed ordering rank used by the search union's ORDER BY directive.
    #[must_use]
    pub const fn search_rank(self) -> u8 {
        match self {
            Self::Film => 1,
            Self::Series => 2,
            Self::ShortFilm => 3,
            Self::Character => 4,
            Self::Director => 5,
        }
    }

    /// Parse a type label as bound by the search union.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Film" => Some(Self::Film),
            "Series" => Some(Self::Series),
            "Short Film" => Some(Self::ShortFilm),
            "Character" => Some(Self::Character),
            "Director" => Some(Self::Director),
            _ => None,
        }
    }

    /// Parse a URL slug.
    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "film" => Some(Self::Film),
            "series" => Some(Self::Series),
            "short" => Some(Self::ShortFilm),
            "character" => Some(Self::Character),
            "director" => Some(Self::Director),
            _ => None,
        }
    }

    /// The primary-key variable name used by queries for this class.
    #[must_use]
    pub const fn key_var(self) -> &'static str {
        match self {
            Self::Film | Self::Series | Self::ShortFilm => "title",
            Self::Character | Self::Director => "name",
        }
    }
}

/// The three work types. Exactly one of these tags a [`Work`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WorkClass {
    Film,
    Series,
    ShortFilm,
}

impl WorkClass {
    /// Widen to the full entity-class set.
    #[must_use]
    pub const fn entity_class(self) -> EntityClass {
        match self {
            Self::Film => EntityClass::Film,
            Self::Series => EntityClass::Series,
            Self::ShortFilm => EntityClass::ShortFilm,
        }
    }

    /// Parse a URL slug, rejecting non-work classes.
    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        match EntityClass::from_slug(slug)? {
            EntityClass::Film => Some(Self::Film),
            EntityClass::Series => Some(Self::Series),
            EntityClass::ShortFilm => Some(Self::ShortFilm),
            EntityClass::Character | EntityClass::Director => None,
        }
    }

    /// URL slug for this work class.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        self.entity_class().slug()
    }
}

// =============================================================================
// WORK RECORDS
// =============================================================================

/// Fields shared by every work type.
///
/// Every field except the title is optional: the knowledge base is sparse and
/// an absent field never suppresses the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WorkCommon {
    /// Primary key for lookups and grouping.
    pub title: String,
    pub release_year: Option<String>,
    pub description: Option<String>,
    pub poster_url: Option<String>,
    pub director: Option<String>,
    /// Distinct genre names, first-seen order.
    pub genres: Vec<String>,
}

/// A work, tagged by its class. The tag determines which optional attributes
/// are meaningful: duration and synopsis exist on films only, plot, episode
/// count, and studio on series only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "class", rename_all = "snake_case")]
pub enum Work {
    Film {
        #[serde(flatten)]
        common: WorkCommon,
        duration: Option<String>,
        synopsis: Option<String>,
    },
    Series {
        #[serde(flatten)]
        common: WorkCommon,
        plot: Option<String>,
        episodes: Option<String>,
        studio: Option<String>,
    },
    ShortFilm {
        #[serde(flatten)]
        common: WorkCommon,
    },
}

impl Work {
    /// The class tagging this work.
    #[must_use]
    pub const fn class(&self) -> WorkClass {
        match self {
            Self::Film { .. } => WorkClass::Film,
            Self::Series { .. } => WorkClass::Series,
            Self::ShortFilm { .. } => WorkClass::ShortFilm,
        }
    }

    /// Shared fields.
    #[must_use]
    pub const fn common(&self) -> &WorkCommon {
        match self {
            Self::Film { common, .. } | Self::Series { common, .. } | Self::ShortFilm { common } => {
                common
            }
        }
    }

    /// Longest-form text available for the hero blurb: synopsis, then plot,
    /// then description.
    #[must_use]
    pub fn synopsis_text(&self) -> Option<&str> {
        let from_class = match self {
            Self::Film { synopsis, .. } => synopsis.as_deref(),
            Self::Series { plot, .. } => plot.as_deref(),
            Self::ShortFilm { .. } => None,
        };
        from_class.or(self.common().description.as_deref())
    }
}

/// One entry in a work listing (grid card projection).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingEntry {
    pub title: String,
    pub release_year: Option<String>,
    pub poster_url: Option<String>,
}

// =============================================================================
// CHARACTER / DIRECTOR RECORDS
// =============================================================================

/// A character. Appears in one or more works.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CharacterRecord {
    /// Primary key for lookups and grouping.
    pub name: String,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
}

/// A director. Directs zero or more works.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DirectorRecord {
    /// Primary key for lookups and grouping.
    pub name: String,
    pub born: Option<String>,
    pub birth_year: Option<String>,
    pub nationality: Option<String>,
    pub description: Option<String>,
    /// Long-form text, truncated for summary display (ontology term: history).
    pub biography: Option<String>,
    pub image_url: Option<String>,
}

// =============================================================================
// SEARCH HITS
// =============================================================================

/// A type-tagged cross-type search result, with the type-dependent display
/// image field already selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub class: EntityClass,
    pub title: String,
    /// Empty for characters and directors.
    pub release_year: Option<String>,
    pub image_url: Option<String>,
}

// =============================================================================
// PREVIEW TRUNCATION
// =============================================================================

/// Synopsis preview cutoff for work detail pages, in characters.
pub const SYNOPSIS_PREVIEW_CHARS: usize = 350;

/// Biography preview cutoff for director detail pages, in characters.
pub const BIOGRAPHY_PREVIEW_CHARS: usize = 1500;

/// A possibly-truncated text field. The renderer decides whether to show a
/// "read more" affordance; truncation is never silent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preview {
    pub text: String,
    pub truncated: bool,
}

impl Preview {
    /// Cut `text` at `cutoff` characters (not bytes).
    ///
    /// Text at or under the cutoff is returned whole with `truncated: false`.
    #[must_use]
    pub fn cut(text: &str, cutoff: usize) -> Self {
        match text.char_indices().nth(cutoff) {
            Some((byte_end, _)) => Self {
                text: text[..byte_end].to_string(),
                truncated: true,
            },
            None => Self {
                text: text.to_string(),
                truncated: false,
            },
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors surfaced by the cinegraph layers.
///
/// The core never retries: every failure kind is returned to the caller as a
/// typed result and the rendering layer decides the user-visible behavior.
#[derive(Debug, Error)]
pub enum CinegraphError {
    /// The remote endpoint is unreachable, timed out, or returned a
    /// non-success status. Never silently treated as "no results".
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body is not valid JSON or lacks the expected top-level
    /// shape. Distinct from an empty result.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// A lookup normalized to zero groups. Expected, non-exceptional.
    #[error("not found")]
    NotFound,

    /// The image relay received an unparseable or non-URL parameter.
    #[error("invalid image source: {0}")]
    InvalidImageSource(String),

    /// Configuration could not be loaded or is inconsistent.
    #[error("configuration error: {0}")]
    Config(String),

    /// An I/O error occurred (binary startup paths only).
    #[error("I/O error: {0}")]
    Io(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_class_label_round_trip() {
        for class in [
            EntityClass::Film,
            EntityClass::Series,
            EntityClass::ShortFilm,
            EntityClass::Character,
            EntityClass::Director,
        ] {
            assert_eq!(EntityClass::from_label(class.label()), Some(class));
            assert_eq!(EntityClass::from_slug(class.slug()), Some(class));
        }
        assert_eq!(EntityClass::from_label("Studio"), None);
    }

    #[test]
    fn search_rank_follows_declaration_order() {
        assert!(EntityClass::Film.search_rank() < EntityClass::Series.search_rank());
        assert!(EntityClass::Series.search_rank() < EntityClass::ShortFilm.search_rank());
        assert!(EntityClass::ShortFilm.search_rank() < EntityClass::Character.search_rank());
        assert!(EntityClass::Character.search_rank() < EntityClass::Director.search_rank());
    }

    #[test]
    fn work_class_rejects_non_work_slugs() {
        assert_eq!(WorkClass::from_slug("film"), Some(WorkClass::Film));
        assert_eq!(WorkClass::from_slug("short"), Some(WorkClass::ShortFilm));
        assert_eq!(WorkClass::from_slug("character"), None);
        assert_eq!(WorkClass::from_slug("director"), None);
    }

    #[test]
    fn synopsis_text_prefers_class_specific_field() {
        let work = Work::Film {
            common: WorkCommon {
                title: "Ponyo".to_string(),
                description: Some("short blurb".to_string()),
                ..WorkCommon::default()
            },
            duration: None,
            synopsis: Some("long synopsis".to_string()),
        };
        assert_eq!(work.synopsis_text(), Some("long synopsis"));
    }

    #[test]
    fn synopsis_text_falls_back_to_description() {
        let work = Work::ShortFilm {
            common: WorkCommon {
                title: "On Your Mark".to_string(),
                description: Some("blurb".to_string()),
                ..WorkCommon::default()
            },
        };
        assert_eq!(work.synopsis_text(), Some("blurb"));
    }

    #[test]
    fn preview_cut_exact_boundary() {
        let text = "a".repeat(400);
        let preview = Preview::cut(&text, 350);
        assert_eq!(preview.text.chars().count(), 350);
        assert!(preview.truncated);

        let text = "a".repeat(300);
        let preview = Preview::cut(&text, 350);
        assert_eq!(preview.text.chars().count(), 300);
        assert!(!preview.truncated);

        let text = "a".repeat(350);
        let preview = Preview::cut(&text, 350);
        assert!(!preview.truncated);
    }

    #[test]
    fn preview_cut_counts_chars_not_bytes() {
        let text = "géné".repeat(100); // 400 chars, more bytes
        let preview = Preview::cut(&text, 350);
        assert_eq!(preview.text.chars().count(), 350);
        assert!(preview.truncated);
    }
}
