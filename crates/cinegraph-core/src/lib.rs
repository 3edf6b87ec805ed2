//! # cinegraph-core
//!
//! Query composition and result normalization over a remote film knowledge
//! graph - THE LOGIC.
//!
//! This crate builds parameterized SPARQL queries per entity class and use
//! case, parses the endpoint's tabular JSON results, and normalizes the
//! sparse, optional-field rows into typed, render-ready records. It also
//! carries the five-way type-tagged search projection and the image
//! fallback chain.
//!
//! ## Architectural Constraints
//!
//! - Pure Rust: no async, no network dependencies. Execution lives in the
//!   binary; every function here is a transformation over one
//!   request/response pair.
//! - Stateless: entities are read-only projections, constructed from a
//!   query response and discarded after rendering. No caching, no mutation.
//! - Total over sparse input: absent optional fields never suppress a row,
//!   and empty results are values, not panics.

// =============================================================================
// MODULES
// =============================================================================

pub mod compose;
pub mod image;
pub mod normalize;
pub mod response;
pub mod search;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use types::{
    BIOGRAPHY_PREVIEW_CHARS, CharacterRecord, CinegraphError, DirectorRecord, EntityClass,
    ListingEntry, Preview, SYNOPSIS_PREVIEW_CHARS, SearchHit, Work, WorkClass, WorkCommon,
};

// =============================================================================
// RE-EXPORTS: Pipeline
// =============================================================================

pub use compose::{ListingSort, ONTOLOGY_PREFIX, QueryComposer};
pub use image::{ImageResolver, ImageSource};
pub use response::{BoundValue, Row, parse_rows};
pub use search::collect_hits;
