//! # Catalog
//!
//! The aggregation layer: composes queries, fans them out to the endpoint
//! concurrently, normalizes the row sets, resolves image sources, and shapes
//! the view models the API serves. All query text and all row shaping come
//! from `cinegraph-core`; this module owns the fan-out and the page
//! composition only.

use crate::client::EndpointClient;
use cinegraph_core::{
    BIOGRAPHY_PREVIEW_CHARS, CharacterRecord, CinegraphError, DirectorRecord, EntityClass,
    ImageResolver, ImageSource, ListingSort, Preview, QueryComposer, Row, SYNOPSIS_PREVIEW_CHARS,
    SearchHit, Work, WorkClass, collect_hits, normalize,
};
use serde::Serialize;

/// Rail length on the home page for each work class.
const HOME_RAIL_LIMIT: usize = 5;
/// Director strip length on the home page.
const HOME_DIRECTOR_LIMIT: usize = 10;
/// Sibling characters shown on character and work detail pages.
const RELATED_LIMIT: usize = 3;
/// Characters shown on a work detail page.
const CAST_LIMIT: usize = 12;

// =============================================================================
// VIEW MODELS
// =============================================================================

/// A grid card for a work: title, year, resolved display image.
#[derive(Debug, Clone, Serialize)]
pub struct WorkCard {
    pub title: String,
    pub release_year: Option<String>,
    pub image: ImageSource,
}

/// A card for a character or director.
#[derive(Debug, Clone, Serialize)]
pub struct PersonCard {
    pub name: String,
    pub image: ImageSource,
}

#[derive(Debug, Clone, Serialize)]
pub struct HomePage {
    pub films: Vec<WorkCard>,
    pub series: Vec<WorkCard>,
    pub short_films: Vec<WorkCard>,
    pub directors: Vec<PersonCard>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListingPage {
    pub class: WorkClass,
    pub entries: Vec<WorkCard>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkDetail {
    #[serde(flatten)]
    pub work: Work,
    pub hero: ImageSource,
    pub poster: ImageSource,
    pub synopsis_preview: Option<Preview>,
    pub characters: Vec<PersonCard>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CharacterDetail {
    #[serde(flatten)]
    pub character: CharacterRecord,
    pub portrait: ImageSource,
    /// Title of a work the character appears in, when the graph records one.
    pub appears_in: Option<String>,
    pub related: Vec<PersonCard>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DirectorDetail {
    #[serde(flatten)]
    pub director: DirectorRecord,
    pub portrait: ImageSource,
    pub biography_preview: Option<Preview>,
    pub works: Vec<WorkCard>,
}

/// A search hit with its display image resolved.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub class: EntityClass,
    pub title: String,
    pub release_year: Option<String>,
    pub image: ImageSource,
}

// =============================================================================
// CATALOG
// =============================================================================

#[derive(Debug, Clone)]
pub struct Catalog {
    client: EndpointClient,
    resolver: ImageResolver,
}

impl Catalog {
    #[must_use]
    pub fn new(client: EndpointClient, resolver: ImageResolver) -> Self {
        Self { client, resolver }
    }

    /// Home page: one rail per work class plus a director strip, fetched
    /// concurrently. A failure in any fetch fails the page.
    pub async fn home(&self) -> Result<HomePage, CinegraphError> {
        let (films, series, shorts, directors) = tokio::join!(
            self.listing_rows(EntityClass::Film, ListingSort::ReleaseYear, HOME_RAIL_LIMIT),
            self.listing_rows(EntityClass::Series, ListingSort::ReleaseYear, HOME_RAIL_LIMIT),
            self.listing_rows(EntityClass::ShortFilm, ListingSort::ReleaseYear, HOME_RAIL_LIMIT),
            self.listing_rows(EntityClass::Director, ListingSort::Title, HOME_DIRECTOR_LIMIT),
        );
        Ok(HomePage {
            films: self.work_cards(&films?),
            series: self.work_cards(&series?),
            short_films: self.work_cards(&shorts?),
            directors: normalize::collect_directors(&directors?)
                .into_iter()
                .map(|d| self.director_card(&d))
                .collect(),
        })
    }

    /// Full listing for one work class, sorted by title.
    pub async fn listing(&self, class: WorkClass) -> Result<ListingPage, CinegraphError> {
        let rows = self
            .client
            .select(&QueryComposer::listing(
                class.entity_class(),
                Some(ListingSort::Title),
                None,
            ))
            .await?;
        Ok(ListingPage {
            class,
            entries: self.work_cards(&rows),
        })
    }

    /// Work detail page: the record plus its cast, fetched concurrently.
    /// The name match is a case-insensitive substring; ties resolve to the
    /// first grouped title in endpoint order.
    pub async fn work_detail(
        &self,
        class: WorkClass,
        name: &str,
    ) -> Result<WorkDetail, CinegraphError> {
        let lookup_query = QueryComposer::lookup(class.entity_class(), name);
        let related_query = QueryComposer::related(class.entity_class(), name, CAST_LIMIT);
        let (detail, cast) = tokio::join!(
            self.client.select(&lookup_query),
            self.client.select(&related_query),
        );
        let work = normalize::lookup_work(&detail?, class)?;
        let characters = normalize::collect_sibling_characters(&cast?)
            .into_iter()
            .map(|c| self.character_card(&c))
            .collect();

        let title = work.common().title.clone();
        let poster_url = work.common().poster_url.clone();
        Ok(WorkDetail {
            hero: self.resolver.hero(&title),
            poster: self.resolver.resolve_opt(poster_url.as_deref(), &title),
            synopsis_preview: work
                .synopsis_text()
                .map(|t| Preview::cut(t, SYNOPSIS_PREVIEW_CHARS)),
            characters,
            work,
        })
    }

    /// Character detail page: the record, one work they appear in, and a few
    /// co-characters, fetched concurrently.
    pub async fn character_detail(&self, name: &str) -> Result<CharacterDetail, CinegraphError> {
        let lookup_query = QueryComposer::lookup(EntityClass::Character, name);
        let appears_query = QueryComposer::work_of_character(name);
        let related_query = QueryComposer::related(EntityClass::Character, name, RELATED_LIMIT);
        let (detail, appears, related) = tokio::join!(
            self.client.select(&lookup_query),
            self.client.select(&appears_query),
            self.client.select(&related_query),
        );
        let character = normalize::lookup_character(&detail?)?;
        let appears_in = appears?
            .first()
            .and_then(|row: &Row| row.get("workTitle").map(str::to_string));
        let related = normalize::collect_sibling_characters(&related?)
            .into_iter()
            .map(|c| self.character_card(&c))
            .collect();

        Ok(CharacterDetail {
            portrait: self
                .resolver
                .resolve_opt(character.image_url.as_deref(), &character.name),
            appears_in,
            related,
            character,
        })
    }

    /// Director detail page: the record plus their filmography, fetched
    /// concurrently. The biography is previewed at the long-form cutoff.
    pub async fn director_detail(&self, name: &str) -> Result<DirectorDetail, CinegraphError> {
        let lookup_query = QueryComposer::lookup(EntityClass::Director, name);
        let works_query = QueryComposer::related(EntityClass::Director, name, CAST_LIMIT);
        let (detail, works) = tokio::join!(
            self.client.select(&lookup_query),
            self.client.select(&works_query),
        );
        let director = normalize::lookup_director(&detail?)?;
        let works = self.work_cards(&works?);

        Ok(DirectorDetail {
            portrait: self
                .resolver
                .resolve_opt(director.image_url.as_deref(), &director.name),
            biography_preview: director
                .biography
                .as_deref()
                .map(|t| Preview::cut(t, BIOGRAPHY_PREVIEW_CHARS)),
            works,
            director,
        })
    }

    /// Full character roster.
    pub async fn characters(&self) -> Result<Vec<PersonCard>, CinegraphError> {
        let rows = self
            .client
            .select(&QueryComposer::listing(
                EntityClass::Character,
                Some(ListingSort::Title),
                None,
            ))
            .await?;
        Ok(normalize::collect_characters(&rows)
            .iter()
            .map(|c| self.character_card(c))
            .collect())
    }

    /// Full director roster.
    pub async fn directors(&self) -> Result<Vec<PersonCard>, CinegraphError> {
        let rows = self
            .client
            .select(&QueryComposer::listing(
                EntityClass::Director,
                Some(ListingSort::Title),
                None,
            ))
            .await?;
        Ok(normalize::collect_directors(&rows)
            .iter()
            .map(|d| self.director_card(d))
            .collect())
    }

    /// Cross-type search. The endpoint already orders hits by type
    /// precedence and release year; the order of `collect_hits` is final and
    /// never re-sorted here.
    pub async fn search(&self, term: &str) -> Result<Vec<SearchResult>, CinegraphError> {
        let rows = self.client.select(&QueryComposer::search_union(term)).await?;
        let hits = collect_hits(&rows)?;
        Ok(hits.into_iter().map(|h| self.search_result(h)).collect())
    }

    // =========================================================================
    // CARD PROJECTION
    // =========================================================================

    async fn listing_rows(
        &self,
        class: EntityClass,
        sort: ListingSort,
        limit: usize,
    ) -> Result<Vec<Row>, CinegraphError> {
        self.client
            .select(&QueryComposer::listing(class, Some(sort), Some(limit)))
            .await
    }

    fn work_cards(&self, rows: &[Row]) -> Vec<WorkCard> {
        normalize::collect_listing(rows)
            .into_iter()
            .map(|entry| WorkCard {
                image: self
                    .resolver
                    .resolve_opt(entry.poster_url.as_deref(), &entry.title),
                title: entry.title,
                release_year: entry.release_year,
            })
            .collect()
    }

    fn character_card(&self, character: &CharacterRecord) -> PersonCard {
        PersonCard {
            image: self
                .resolver
                .resolve_opt(character.image_url.as_deref(), &character.name),
            name: character.name.clone(),
        }
    }

    fn director_card(&self, director: &DirectorRecord) -> PersonCard {
        PersonCard {
            image: self
                .resolver
                .resolve_opt(director.image_url.as_deref(), &director.name),
            name: director.name.clone(),
        }
    }

    fn search_result(&self, hit: SearchHit) -> SearchResult {
        SearchResult {
            image: self.resolver.resolve_opt(hit.image_url.as_deref(), &hit.title),
            class: hit.class,
            title: hit.title,
            release_year: hit.release_year,
        }
    }
}
