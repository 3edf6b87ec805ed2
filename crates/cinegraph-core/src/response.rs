//! # Response Parsing
//!
//! The remote endpoint answers SPARQL SELECT queries with the standard JSON
//! results shape:
//!
//! ```json
//! { "results": { "bindings": [ { "title": { "value": "Ponyo" } } ] } }
//! ```
//!
//! Absence of `results.bindings` is zero rows, not an error; a body that is
//! not a JSON object at all is a [`CinegraphError::MalformedResponse`].

use crate::types::CinegraphError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// WIRE SHAPE
// =============================================================================

/// One bound value. The endpoint also reports a value type and datatype;
/// this layer only consumes the lexical form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BoundValue {
    pub value: String,
}

/// One result row: a mapping from variable name to an optional bound value.
/// Variables left unbound by OPTIONAL clauses are simply absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Row(pub BTreeMap<String, BoundValue>);

impl Row {
    /// The lexical value bound to `var`, if any.
    #[must_use]
    pub fn get(&self, var: &str) -> Option<&str> {
        self.0.get(var).map(|b| b.value.as_str())
    }

    /// The value bound to `var`, or a malformed-response error naming the
    /// missing variable. Used for variables the query binds unconditionally.
    pub fn require(&self, var: &str) -> Result<&str, CinegraphError> {
        self.get(var).ok_or_else(|| {
            CinegraphError::MalformedResponse(format!("row is missing required variable ?{var}"))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
struct ResultSet {
    #[serde(default)]
    bindings: Vec<Row>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
struct SelectResponse {
    #[serde(default)]
    results: ResultSet,
}

// =============================================================================
// PARSING
// =============================================================================

/// Parse a response body into rows.
///
/// A JSON object missing `results` or `bindings` deserializes to zero rows;
/// anything that is not a JSON object is malformed.
pub fn parse_rows(body: &str) -> Result<Vec<Row>, CinegraphError> {
    let response: SelectResponse = serde_json::from_str(body)
        .map_err(|e| CinegraphError::MalformedResponse(e.to_string()))?;
    Ok(response.results.bindings)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bindings() {
        let body = r#"{
            "head": { "vars": ["title", "releaseYear"] },
            "results": { "bindings": [
                { "title": { "type": "literal", "value": "Ponyo" },
                  "releaseYear": { "type": "literal", "value": "2008" } },
                { "title": { "type": "literal", "value": "Porco Rosso" } }
            ] }
        }"#;
        let rows = parse_rows(body).expect("parse");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("title"), Some("Ponyo"));
        assert_eq!(rows[0].get("releaseYear"), Some("2008"));
        assert_eq!(rows[1].get("releaseYear"), None);
    }

    #[test]
    fn missing_bindings_is_zero_rows() {
        assert!(parse_rows("{}").expect("parse").is_empty());
        assert!(parse_rows(r#"{"results":{}}"#).expect("parse").is_empty());
        assert!(parse_rows(r#"{"head":{"vars":[]}}"#).expect("parse").is_empty());
    }

    #[test]
    fn non_object_body_is_malformed() {
        assert!(matches!(
            parse_rows("not json at all"),
            Err(CinegraphError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_rows(r#"["results"]"#),
            Err(CinegraphError::MalformedResponse(_))
        ));
    }

    #[test]
    fn require_reports_the_variable() {
        let rows = parse_rows(r#"{"results":{"bindings":[{}]}}"#).expect("parse");
        let err = rows[0].require("type").expect_err("must fail");
        assert!(err.to_string().contains("?type"));
    }
}
