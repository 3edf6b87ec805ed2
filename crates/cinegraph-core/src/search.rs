//! # Search Hit Projection
//!
//! Converts rows from the five-way search union into type-tagged
//! [`SearchHit`]s. The composed query already orders rows (type precedence,
//! then release year); nothing here re-sorts; the response order is
//! authoritative, so remote and local ordering cannot diverge.

use crate::response::Row;
use crate::types::{CinegraphError, EntityClass, SearchHit};

/// Project one union row into a hit.
///
/// Image field selection is an exhaustive match over the closed entity-type
/// set: characters and directors prefer their portrait (`?imageURL`),
/// falling back to whatever generic image field the row carries; work types
/// use their poster exclusively.
fn hit_from_row(row: &Row) -> Result<SearchHit, CinegraphError> {
    let label = row.require("type")?;
    let class = EntityClass::from_label(label).ok_or_else(|| {
        CinegraphError::MalformedResponse(format!("unknown entity type label: {label:?}"))
    })?;
    let title = row.require("title")?.to_string();

    let image_url = match class {
        EntityClass::Character | EntityClass::Director => {
            row.get("imageURL").or_else(|| row.get("posterURL"))
        }
        EntityClass::Film | EntityClass::Series | EntityClass::ShortFilm => row.get("posterURL"),
    };

    Ok(SearchHit {
        class,
        title,
        // The union binds '' for characters and directors.
        release_year: row
            .get("releaseYear")
            .filter(|y| !y.is_empty())
            .map(str::to_string),
        image_url: image_url.filter(|u| !u.is_empty()).map(str::to_string),
    })
}

/// Project all union rows, preserving response order.
pub fn collect_hits(rows: &[Row]) -> Result<Vec<SearchHit>, CinegraphError> {
    rows.iter().map(hit_from_row).collect()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::parse_rows;

    fn rows(body: &str) -> Vec<Row> {
        parse_rows(body).expect("fixture parses")
    }

    #[test]
    fn film_before_director_with_correct_image_sources() {
        let body = r#"{ "results": { "bindings": [
            { "type": { "value": "Film" },
              "title": { "value": "Castle in the Sky" },
              "releaseYear": { "value": "1986" },
              "posterURL": { "value": "http://img/castle-poster.jpg" } },
            { "type": { "value": "Director" },
              "title": { "value": "Hayao Miyazaki" },
              "releaseYear": { "value": "" },
              "imageURL": { "value": "http://img/miyazaki.jpg" } }
        ] } }"#;
        let hits = collect_hits(&rows(body)).expect("hits");
        assert_eq!(hits.len(), 2);

        assert_eq!(hits[0].class, EntityClass::Film);
        assert_eq!(hits[0].title, "Castle in the Sky");
        assert_eq!(hits[0].release_year.as_deref(), Some("1986"));
        assert_eq!(
            hits[0].image_url.as_deref(),
            Some("http://img/castle-poster.jpg")
        );

        assert_eq!(hits[1].class, EntityClass::Director);
        assert_eq!(hits[1].release_year, None);
        assert_eq!(hits[1].image_url.as_deref(), Some("http://img/miyazaki.jpg"));
    }

    #[test]
    fn character_falls_back_to_generic_image_field() {
        let body = r#"{ "results": { "bindings": [
            { "type": { "value": "Character" },
              "title": { "value": "Ponyo" },
              "releaseYear": { "value": "" },
              "posterURL": { "value": "http://img/ponyo.png" } }
        ] } }"#;
        let hits = collect_hits(&rows(body)).expect("hits");
        assert_eq!(hits[0].image_url.as_deref(), Some("http://img/ponyo.png"));
    }

    #[test]
    fn work_types_never_use_the_portrait_field() {
        let body = r#"{ "results": { "bindings": [
            { "type": { "value": "Series" },
              "title": { "value": "Sherlock Hound" },
              "releaseYear": { "value": "1984" },
              "imageURL": { "value": "http://img/stray-portrait.jpg" } }
        ] } }"#;
        let hits = collect_hits(&rows(body)).expect("hits");
        assert_eq!(hits[0].image_url, None);
    }

    #[test]
    fn unknown_type_label_is_malformed() {
        let body = r#"{ "results": { "bindings": [
            { "type": { "value": "Studio" }, "title": { "value": "Ghibli" } }
        ] } }"#;
        assert!(matches!(
            collect_hits(&rows(body)),
            Err(CinegraphError::MalformedResponse(_))
        ));
    }

    #[test]
    fn response_order_is_preserved_verbatim() {
        // Deliberately "wrong" order: the projection must not fix it.
        let body = r#"{ "results": { "bindings": [
            { "type": { "value": "Director" }, "title": { "value": "B" } },
            { "type": { "value": "Film" }, "title": { "value": "A" } }
        ] } }"#;
        let hits = collect_hits(&rows(body)).expect("hits");
        assert_eq!(hits[0].class, EntityClass::Director);
        assert_eq!(hits[1].class, EntityClass::Film);
    }
}
