//! # Query Composition
//!
//! Builds SPARQL query text for each (entity class, use case) pair. Pure:
//! composition has no execution side effects.
//!
//! Lookups are case-insensitive **substring** matches (`regex(?title, term,
//! "i")`), not exact matches. Titles that are substrings of other titles
//! ("Ponyo" vs a hypothetical "Ponyo 2") therefore collide; the normalizer
//! resolves the collision deterministically (first group in response order
//! wins). This looseness is a documented property of the system, not a bug
//! to fix here.
//!
//! Every caller-supplied term is escaped by [`escape`] before it is embedded
//! in query text, so a term can never alter query structure.

use crate::types::{EntityClass, WorkClass};
use std::fmt::Write as _;

/// Ontology prefix shared by every composed query.
pub const ONTOLOGY_PREFIX: &str = "PREFIX ghibli: <http://ghibliwiki.org/ontology#>";

// =============================================================================
// LITERAL ESCAPING
// =============================================================================

/// Escaping of caller-supplied terms for embedding in query text.
///
/// SPARQL has no bound parameters for this transport, so terms are escaped
/// as literals instead: once for the string-literal grammar (quotes,
/// backslashes, line breaks) and, for regex filters, once more for the
/// regex metacharacter set. A quote in a term reaches the endpoint as a
/// character inside the literal, never as a delimiter.
pub mod escape {
    /// Escape a term for use inside a double-quoted regex filter literal.
    ///
    /// Regex metacharacters are matched literally: a search for `2.0` must
    /// not match `230`.
    #[must_use]
    pub fn regex_literal(term: &str) -> String {
        let mut out = String::with_capacity(term.len());
        for c in term.chars() {
            match c {
                // A literal backslash: regex-escape it, then literal-escape
                // both backslashes of the pattern.
                '\\' => out.push_str(r"\\\\"),
                '"' => out.push_str(r#"\""#),
                '\n' => out.push_str(r"\n"),
                '\r' => out.push_str(r"\r"),
                '\t' => out.push_str(r"\t"),
                '.' | '^' | '$' | '*' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '|' => {
                    out.push_str(r"\\");
                    out.push(c);
                }
                _ => out.push(c),
            }
        }
        out
    }

    /// Escape a term for use inside a plain double-quoted string literal
    /// (exact comparisons, e.g. anchor exclusion in related-entity queries).
    #[must_use]
    pub fn string_literal(term: &str) -> String {
        let mut out = String::with_capacity(term.len());
        for c in term.chars() {
            match c {
                '\\' => out.push_str(r"\\"),
                '"' => out.push_str(r#"\""#),
                '\n' => out.push_str(r"\n"),
                '\r' => out.push_str(r"\r"),
                '\t' => out.push_str(r"\t"),
                _ => out.push(c),
            }
        }
        out
    }
}

// =============================================================================
// USE-CASE PARAMETERS
// =============================================================================

/// Sort directive for listings. The remote service sorts; callers must not
/// re-sort, to avoid double-sorting divergence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingSort {
    ReleaseYear,
    Title,
}

// =============================================================================
// QUERY COMPOSER
// =============================================================================

/// Builds query text per entity class and use case.
pub struct QueryComposer;

impl QueryComposer {
    /// Single-entity lookup: all attributes of the class, matched by
    /// case-insensitive substring on the primary key.
    #[must_use]
    pub fn lookup(class: EntityClass, name: &str) -> String {
        match class {
            EntityClass::Film | EntityClass::Series | EntityClass::ShortFilm => {
                // Widening is infallible for the three work variants.
                let work = match class {
                    EntityClass::Series => WorkClass::Series,
                    EntityClass::ShortFilm => WorkClass::ShortFilm,
                    _ => WorkClass::Film,
                };
                Self::work_lookup(work, name)
            }
            EntityClass::Character => Self::character_lookup(name),
            EntityClass::Director => Self::director_lookup(name),
        }
    }

    fn work_lookup(class: WorkClass, name: &str) -> String {
        let (vars, extra_optionals) = match class {
            WorkClass::Film => (
                "?title ?releaseYear ?duration ?description ?synopsis ?posterURL ?directorName ?genre",
                "    OPTIONAL { ?item ghibli:duration ?duration }\n\
                 \x20   OPTIONAL { ?item ghibli:synopsis ?synopsis }\n",
            ),
            WorkClass::Series => (
                "?title ?releaseYear ?description ?plot ?posterURL ?directorName ?genre ?episodes ?studio",
                "    OPTIONAL { ?item ghibli:plot ?plot }\n\
                 \x20   OPTIONAL { ?item ghibli:numberOfEpisodes ?episodes }\n\
                 \x20   OPTIONAL { ?item ghibli:producedBy ?studioItem .\n\
                 \x20              ?studioItem ghibli:name ?studio }\n",
            ),
            WorkClass::ShortFilm => (
                "?title ?releaseYear ?description ?posterURL ?directorName ?genre",
                "",
            ),
        };

        format!(
            "{prefix}\n\n\
             SELECT DISTINCT {vars}\n\
             WHERE {{\n\
             \x20   ?item a {iri} ;\n\
             \x20         ghibli:title ?title .\n\
             \x20   OPTIONAL {{ ?item ghibli:releaseYear ?releaseYear }}\n\
             \x20   OPTIONAL {{ ?item ghibli:description ?description }}\n\
             \x20   OPTIONAL {{ ?item ghibli:posterURL ?posterURL }}\n\
             \x20   OPTIONAL {{ ?item ghibli:hasDirector ?director .\n\
             \x20              ?director ghibli:name ?directorName }}\n\
             \x20   OPTIONAL {{ ?item ghibli:hasGenre ?genreItem .\n\
             \x20              ?genreItem ghibli:name ?genre }}\n\
             {extra_optionals}\
             \x20   FILTER (regex(?title, \"{term}\", \"i\"))\n\
             }}\n",
            prefix = ONTOLOGY_PREFIX,
            vars = vars,
            iri = class.entity_class().iri(),
            extra_optionals = extra_optionals,
            term = escape::regex_literal(name),
        )
    }

    fn character_lookup(name: &str) -> String {
        format!(
            "{prefix}\n\n\
             SELECT DISTINCT ?name ?age ?gender ?imageURL ?description\n\
             WHERE {{\n\
             \x20   ?character a ghibli:Character ;\n\
             \x20              ghibli:name ?name .\n\
             \x20   OPTIONAL {{ ?character ghibli:age ?age }}\n\
             \x20   OPTIONAL {{ ?character ghibli:gender ?gender }}\n\
             \x20   OPTIONAL {{ ?character ghibli:imageURL ?imageURL }}\n\
             \x20   OPTIONAL {{ ?character ghibli:description ?description }}\n\
             \x20   FILTER (regex(?name, \"{term}\", \"i\"))\n\
             }}\n",
            prefix = ONTOLOGY_PREFIX,
            term = escape::regex_literal(name),
        )
    }

    fn director_lookup(name: &str) -> String {
        format!(
            "{prefix}\n\n\
             SELECT DISTINCT ?name ?born ?birthYear ?nationality ?description ?history ?imageURL\n\
             WHERE {{\n\
             \x20   ?director a ghibli:Director ;\n\
             \x20             ghibli:name ?name .\n\
             \x20   OPTIONAL {{ ?director ghibli:born ?born }}\n\
             \x20   OPTIONAL {{ ?director ghibli:birthYear ?birthYear }}\n\
             \x20   OPTIONAL {{ ?director ghibli:nationality ?nationality }}\n\
             \x20   OPTIONAL {{ ?director ghibli:description ?description }}\n\
             \x20   OPTIONAL {{ ?director ghibli:history ?history }}\n\
             \x20   OPTIONAL {{ ?director ghibli:imageURL ?imageURL }}\n\
             \x20   FILTER (regex(?name, \"{term}\", \"i\"))\n\
             }}\n",
            prefix = ONTOLOGY_PREFIX,
            term = escape::regex_literal(name),
        )
    }

    /// Class listing. Works project the grid-card fields; characters and
    /// directors project their full field sets. `limit` bounds homepage
    /// sections; `None` lists everything.
    #[must_use]
    pub fn listing(class: EntityClass, sort: Option<ListingSort>, limit: Option<usize>) -> String {
        let mut query = match class {
            EntityClass::Film | EntityClass::Series | EntityClass::ShortFilm => format!(
                "{prefix}\n\n\
                 SELECT DISTINCT ?title ?releaseYear ?posterURL\n\
                 WHERE {{\n\
                 \x20   ?item a {iri} ;\n\
                 \x20         ghibli:title ?title .\n\
                 \x20   OPTIONAL {{ ?item ghibli:releaseYear ?releaseYear }}\n\
                 \x20   OPTIONAL {{ ?item ghibli:posterURL ?posterURL }}\n\
                 }}\n",
                prefix = ONTOLOGY_PREFIX,
                iri = class.iri(),
            ),
            EntityClass::Character => format!(
                "{prefix}\n\n\
                 SELECT DISTINCT ?name ?imageURL ?age ?gender ?description\n\
                 WHERE {{\n\
                 \x20   ?character a ghibli:Character ;\n\
                 \x20              ghibli:name ?name .\n\
                 \x20   OPTIONAL {{ ?character ghibli:imageURL ?imageURL }}\n\
                 \x20   OPTIONAL {{ ?character ghibli:age ?age }}\n\
                 \x20   OPTIONAL {{ ?character ghibli:gender ?gender }}\n\
                 \x20   OPTIONAL {{ ?character ghibli:description ?description }}\n\
                 }}\n",
                prefix = ONTOLOGY_PREFIX,
            ),
            EntityClass::Director => format!(
                "{prefix}\n\n\
                 SELECT DISTINCT ?name ?born ?nationality ?imageURL\n\
                 WHERE {{\n\
                 \x20   ?director a ghibli:Director ;\n\
                 \x20             ghibli:name ?name .\n\
                 \x20   OPTIONAL {{ ?director ghibli:born ?born }}\n\
                 \x20   OPTIONAL {{ ?director ghibli:nationality ?nationality }}\n\
                 \x20   OPTIONAL {{ ?director ghibli:imageURL ?imageURL }}\n\
                 }}\n",
                prefix = ONTOLOGY_PREFIX,
            ),
        };

        match sort {
            Some(ListingSort::ReleaseYear) => query.push_str("ORDER BY ?releaseYear\n"),
            Some(ListingSort::Title) => {
                let _ = writeln!(query, "ORDER BY ?{}", class.key_var());
            }
            None => {}
        }
        if let Some(n) = limit {
            let _ = writeln!(query, "LIMIT {n}");
        }
        query
    }

    /// Sibling entities sharing a relationship with the anchor, excluding
    /// the anchor itself, bounded by `limit`:
    ///
    /// - anchor character → other characters appearing in the same work
    /// - anchor director → works they directed (type-tagged per branch)
    /// - anchor work → characters appearing in it
    #[must_use]
    pub fn related(class: EntityClass, anchor: &str, limit: usize) -> String {
        let term = escape::regex_literal(anchor);
        let exact = escape::string_literal(anchor);
        match class {
            EntityClass::Character => format!(
                "{prefix}\n\n\
                 SELECT DISTINCT ?characterName ?imageURL\n\
                 WHERE {{\n\
                 \x20   ?mainChar ghibli:name ?mainName ;\n\
                 \x20             ghibli:appearsIn ?work .\n\
                 \x20   ?work ghibli:hasCharacter ?otherChar .\n\
                 \x20   ?otherChar ghibli:name ?characterName .\n\
                 \x20   OPTIONAL {{ ?otherChar ghibli:imageURL ?imageURL }}\n\
                 \x20   FILTER (regex(?mainName, \"{term}\", \"i\"))\n\
                 \x20   FILTER (?characterName != \"{exact}\")\n\
                 }}\n\
                 LIMIT {limit}\n",
                prefix = ONTOLOGY_PREFIX,
            ),
            EntityClass::Director => format!(
                "{prefix}\n\n\
                 SELECT DISTINCT ?title ?releaseYear ?posterURL ?type\n\
                 WHERE {{\n\
                 \x20   ?director ghibli:name ?directorName ;\n\
                 \x20             ghibli:directs ?work .\n\
                 \x20   ?work ghibli:title ?title .\n\
                 \x20   OPTIONAL {{ ?work ghibli:releaseYear ?releaseYear }}\n\
                 \x20   OPTIONAL {{ ?work ghibli:posterURL ?posterURL }}\n\
                 \x20   {{ ?work a ghibli:Film . BIND('Film' AS ?type) }}\n\
                 \x20   UNION\n\
                 \x20   {{ ?work a ghibli:Series . BIND('Series' AS ?type) }}\n\
                 \x20   UNION\n\
                 \x20   {{ ?work a ghibli:ShortFilm . BIND('Short Film' AS ?type) }}\n\
                 \x20   FILTER (regex(?directorName, \"{term}\", \"i\"))\n\
                 }}\n\
                 ORDER BY ?releaseYear\n\
                 LIMIT {limit}\n",
                prefix = ONTOLOGY_PREFIX,
            ),
            EntityClass::Film | EntityClass::Series | EntityClass::ShortFilm => format!(
                "{prefix}\n\n\
                 SELECT DISTINCT ?characterName ?age ?gender ?imageURL ?description\n\
                 WHERE {{\n\
                 \x20   ?item ghibli:title ?title ;\n\
                 \x20         ghibli:hasCharacter ?character .\n\
                 \x20   ?character ghibli:name ?characterName .\n\
                 \x20   OPTIONAL {{ ?character ghibli:imageURL ?imageURL }}\n\
                 \x20   OPTIONAL {{ ?character ghibli:age ?age }}\n\
                 \x20   OPTIONAL {{ ?character ghibli:gender ?gender }}\n\
                 \x20   OPTIONAL {{ ?character ghibli:description ?description }}\n\
                 \x20   FILTER (regex(?title, \"{term}\", \"i\"))\n\
                 }}\n\
                 LIMIT {limit}\n",
                prefix = ONTOLOGY_PREFIX,
            ),
        }
    }

    /// The work a character appears in (first one, for the recommendation
    /// header on character pages).
    #[must_use]
    pub fn work_of_character(name: &str) -> String {
        format!(
            "{prefix}\n\n\
             SELECT DISTINCT ?workTitle\n\
             WHERE {{\n\
             \x20   ?character ghibli:name ?name ;\n\
             \x20              ghibli:appearsIn ?work .\n\
             \x20   ?work ghibli:title ?workTitle .\n\
             \x20   FILTER (regex(?name, \"{term}\", \"i\"))\n\
             }}\n\
             LIMIT 1\n",
            prefix = ONTOLOGY_PREFIX,
            term = escape::regex_literal(name),
        )
    }

    /// Five-way unioned cross-type search.
    ///
    /// Each branch emits the uniform projection {type, title, releaseYear,
    /// posterURL, imageURL} and binds a numeric `?typeOrder` so the
    /// endpoint's own ORDER BY yields the fixed precedence Film, Series,
    /// Short Film, Character, Director, then release year ascending.
    /// Callers must not re-sort.
    #[must_use]
    pub fn search_union(term: &str) -> String {
        let term = escape::regex_literal(term);
        format!(
            "{prefix}\n\n\
             SELECT DISTINCT ?type ?typeOrder ?title ?releaseYear ?posterURL ?imageURL\n\
             WHERE {{\n\
             \x20   {{\n\
             \x20       ?item a ghibli:Film ;\n\
             \x20             ghibli:title ?title ;\n\
             \x20             ghibli:releaseYear ?releaseYear ;\n\
             \x20             ghibli:posterURL ?posterURL .\n\
             \x20       BIND('Film' AS ?type)\n\
             \x20       BIND(1 AS ?typeOrder)\n\
             \x20       FILTER (regex(?title, \"{term}\", \"i\"))\n\
             \x20   }}\n\
             \x20   UNION\n\
             \x20   {{\n\
             \x20       ?item a ghibli:Series ;\n\
             \x20             ghibli:title ?title ;\n\
             \x20             ghibli:releaseYear ?releaseYear .\n\
             \x20       OPTIONAL {{ ?item ghibli:posterURL ?posterURL }}\n\
             \x20       BIND('Series' AS ?type)\n\
             \x20       BIND(2 AS ?typeOrder)\n\
             \x20       FILTER (regex(?title, \"{term}\", \"i\"))\n\
             \x20   }}\n\
             \x20   UNION\n\
             \x20   {{\n\
             \x20       ?item a ghibli:ShortFilm ;\n\
             \x20             ghibli:title ?title ;\n\
             \x20             ghibli:releaseYear ?releaseYear .\n\
             \x20       OPTIONAL {{ ?item ghibli:posterURL ?posterURL }}\n\
             \x20       BIND('Short Film' AS ?type)\n\
             \x20       BIND(3 AS ?typeOrder)\n\
             \x20       FILTER (regex(?title, \"{term}\", \"i\"))\n\
             \x20   }}\n\
             \x20   UNION\n\
             \x20   {{\n\
             \x20       ?item a ghibli:Character ;\n\
             \x20             ghibli:name ?title ;\n\
             \x20             ghibli:imageURL ?imageURL .\n\
             \x20       BIND('Character' AS ?type)\n\
             \x20       BIND(4 AS ?typeOrder)\n\
             \x20       BIND('' AS ?releaseYear)\n\
             \x20       BIND(?imageURL AS ?posterURL)\n\
             \x20       FILTER (regex(?title, \"{term}\", \"i\"))\n\
             \x20   }}\n\
             \x20   UNION\n\
             \x20   {{\n\
             \x20       ?item a ghibli:Director ;\n\
             \x20             ghibli:name ?title .\n\
             \x20       OPTIONAL {{ ?item ghibli:imageURL ?imageURL }}\n\
             \x20       BIND('Director' AS ?type)\n\
             \x20       BIND(5 AS ?typeOrder)\n\
             \x20       BIND('' AS ?releaseYear)\n\
             \x20       FILTER (regex(?title, \"{term}\", \"i\"))\n\
             \x20   }}\n\
             }}\n\
             ORDER BY ?typeOrder ?releaseYear\n",
            prefix = ONTOLOGY_PREFIX,
        )
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_filters_on_the_primary_key() {
        let q = QueryComposer::lookup(EntityClass::Film, "Ponyo");
        assert!(q.contains("a ghibli:Film"));
        assert!(q.contains(r#"FILTER (regex(?title, "Ponyo", "i"))"#));

        let q = QueryComposer::lookup(EntityClass::Director, "Miyazaki");
        assert!(q.contains("a ghibli:Director"));
        assert!(q.contains(r#"FILTER (regex(?name, "Miyazaki", "i"))"#));
    }

    #[test]
    fn lookup_selects_class_specific_fields() {
        let film = QueryComposer::lookup(EntityClass::Film, "x");
        assert!(film.contains("ghibli:duration"));
        assert!(film.contains("ghibli:synopsis"));
        assert!(!film.contains("numberOfEpisodes"));

        let series = QueryComposer::lookup(EntityClass::Series, "x");
        assert!(series.contains("ghibli:numberOfEpisodes"));
        assert!(series.contains("ghibli:producedBy"));
        assert!(series.contains("ghibli:plot"));
        assert!(!series.contains("ghibli:duration"));

        let short = QueryComposer::lookup(EntityClass::ShortFilm, "x");
        assert!(!short.contains("ghibli:duration"));
        assert!(!short.contains("numberOfEpisodes"));

        let director = QueryComposer::lookup(EntityClass::Director, "x");
        assert!(director.contains("ghibli:history"));
        assert!(director.contains("ghibli:birthYear"));
    }

    #[test]
    fn quote_cannot_escape_the_filter_literal() {
        let q = QueryComposer::lookup(EntityClass::Film, r#"Ponyo", "i")) } #"#);
        // The term's quote must arrive escaped; the filter line still ends
        // with the composer's own delimiters.
        assert!(q.contains(r#"\""#));
        assert!(q.contains(r#"Ponyo\""#));
        // No bare quote from the term: every quote in the filter line is
        // either escaped or one of the four delimiters.
        let filter_line = q
            .lines()
            .find(|l| l.contains("FILTER (regex"))
            .expect("filter line");
        let bare_quotes = filter_line
            .char_indices()
            .filter(|&(i, c)| c == '"' && (i == 0 || filter_line.as_bytes()[i - 1] != b'\\'))
            .count();
        assert_eq!(bare_quotes, 4);
    }

    #[test]
    fn regex_metacharacters_are_neutralized() {
        assert_eq!(escape::regex_literal("2.0"), r"2\\.0");
        assert_eq!(escape::regex_literal("a|b"), r"a\\|b");
        assert_eq!(escape::regex_literal(r"a\b"), r"a\\\\b");
        assert_eq!(escape::regex_literal("plain term"), "plain term");
    }

    #[test]
    fn string_literal_escapes_quotes_and_backslashes() {
        assert_eq!(escape::string_literal(r#"a"b"#), r#"a\"b"#);
        assert_eq!(escape::string_literal(r"a\b"), r"a\\b");
        assert_eq!(escape::string_literal("line\nbreak"), r"line\nbreak");
    }

    #[test]
    fn listing_orders_and_limits() {
        let q = QueryComposer::listing(EntityClass::Film, Some(ListingSort::ReleaseYear), Some(5));
        assert!(q.contains("ORDER BY ?releaseYear"));
        assert!(q.ends_with("LIMIT 5\n"));

        let q = QueryComposer::listing(EntityClass::Character, None, None);
        assert!(!q.contains("ORDER BY"));
        assert!(!q.contains("LIMIT"));

        let q = QueryComposer::listing(EntityClass::Series, Some(ListingSort::Title), None);
        assert!(q.contains("ORDER BY ?title"));

        let q = QueryComposer::listing(EntityClass::Director, Some(ListingSort::Title), Some(10));
        assert!(q.contains("ORDER BY ?name"));
        assert!(q.ends_with("LIMIT 10\n"));
    }

    #[test]
    fn related_characters_excludes_the_anchor() {
        let q = QueryComposer::related(EntityClass::Character, "Ponyo", 3);
        assert!(q.contains(r#"FILTER (?characterName != "Ponyo")"#));
        assert!(q.ends_with("LIMIT 3\n"));
    }

    #[test]
    fn related_director_tags_work_types() {
        let q = QueryComposer::related(EntityClass::Director, "Miyazaki", 20);
        assert!(q.contains("ghibli:directs"));
        assert!(q.contains("BIND('Film' AS ?type)"));
        assert!(q.contains("BIND('Short Film' AS ?type)"));
        assert!(q.contains("ORDER BY ?releaseYear"));
    }

    #[test]
    fn related_work_lists_its_characters() {
        let q = QueryComposer::related(EntityClass::Film, "Ponyo", 50);
        assert!(q.contains("ghibli:hasCharacter"));
        assert!(q.contains(r#"FILTER (regex(?title, "Ponyo", "i"))"#));
    }

    #[test]
    fn search_union_has_five_branches_and_remote_ordering() {
        let q = QueryComposer::search_union("castle");
        assert_eq!(q.matches("UNION").count(), 4);
        for (label, order) in [
            ("Film", 1),
            ("Series", 2),
            ("Short Film", 3),
            ("Character", 4),
            ("Director", 5),
        ] {
            assert!(q.contains(&format!("BIND('{label}' AS ?type)")));
            assert!(q.contains(&format!("BIND({order} AS ?typeOrder)")));
        }
        assert!(q.contains("ORDER BY ?typeOrder ?releaseYear"));
        // Character branch feeds its portrait into the uniform projection.
        assert!(q.contains("BIND(?imageURL AS ?posterURL)"));
    }

    #[test]
    fn work_of_character_is_bounded() {
        let q = QueryComposer::work_of_character("Sosuke");
        assert!(q.contains("ghibli:appearsIn"));
        assert!(q.ends_with("LIMIT 1\n"));
    }
}
