//! # Image Resolution
//!
//! Produces the final image reference for a given (entity, candidate remote
//! URL). Pure: no network access happens here; the relay referenced by
//! [`ImageSource::Relay`] is a separate boundary component in the binary.
//!
//! The fallback chain, in order: remote URL through the same-origin relay →
//! curated local hero asset keyed by exact display title → generic
//! placeholder.

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};

// =============================================================================
// CURATED HERO ASSETS
// =============================================================================

/// Exact display title → local hero asset file.
const HERO_IMAGES: &[(&str, &str)] = &[
    // Films
    ("Castle in the Sky", "castle.jpg"),
    ("Earwig and the Witch", "earwig.jpg"),
    ("From Up on Poppy Hill", "poppy.jpg"),
    ("Grave of the Fireflies", "fireflies.jpg"),
    ("Howl's Moving Castle", "howl.jpg"),
    ("Kiki's Delivery Service", "kiki.jpg"),
    ("Mary and the Witch's Flower", "mary.jpg"),
    ("Modest Heroes", "modest.jpg"),
    ("My Neighbor Totoro", "totoro.jpg"),
    ("My Neighbors the Yamadas", "yamadas.jpg"),
    ("Nausicaä of the Valley of the Wind", "nausicaa.jpg"),
    ("Ocean Waves", "ocean.jpg"),
    ("Only Yesterday", "yesterday.jpg"),
    ("Panda! Go, Panda!", "panda.jpg"),
    ("Pom Poko", "pompoko.jpg"),
    ("Ponyo", "ponyo.jpg"),
    ("Porco Rosso", "porco.jpg"),
    ("Princess Mononoke", "mononoke.jpg"),
    ("Spirited Away", "spirited.jpg"),
    ("Tales from Earthsea", "earthsea.jpg"),
    ("The Boy and the Heron", "heron.jpg"),
    ("The Castle of Cagliostro", "cagliostro.jpg"),
    ("The Cat Returns", "catreturns.jpg"),
    ("The Imaginary", "imaginary.jpg"),
    ("The Red Turtle", "redturtle.jpg"),
    ("The Secret World of Arrietty", "arrietty.jpg"),
    ("The Tale of the Princess Kaguya", "kaguya.jpg"),
    ("The Wind Rises", "windrises.jpg"),
    // Series
    ("Ronja, the Robber's Daughter", "ronja.jpg"),
    ("Sherlock Hound", "hound.jpg"),
    ("Film Guru Guru", "guru.jpg"),
    // Shorts
    ("3000 Leagues in Search of Mother", "3000leagues.jpg"),
    ("A Sumo Wrestler's Tail", "sumo.jpg"),
    ("Boro the Caterpillar", "boro.jpg"),
    ("Ghiblies", "ghiblies.jpg"),
    ("Ghiblies Episode 2", "ghiblies2.jpg"),
    ("Giant God Warrior Appears in Tokyo", "giantgod.jpg"),
    ("Hoshi o Katta Hi", "hoshi.jpg"),
    ("Iblard Jikan", "iblard.jpg"),
    ("Imaginary Flying Machines", "flying.jpg"),
    ("Koro's Big Day Out", "koro.jpg"),
    ("Kujiratori", "kujiratori.jpg"),
    ("Looking for a Home", "home.jpg"),
    ("Mei and the Kittenbus", "mei.jpg"),
    ("Mr. Dough and the Egg Princess", "egg.jpg"),
    ("On Your Mark", "onyourmark.jpg"),
    ("Portable Airport", "airport.jpg"),
    ("Red Crow and the Ghost Ship", "redcrow.jpg"),
    ("Soratobu Toshikeikaku", "soratobu.jpg"),
    ("Space Station No. 9", "spacestation.jpg"),
    ("The Invention of Imaginary Machines of Destruction", "invention.jpg"),
    ("The Night of Taneyamagahara", "taneyama.jpg"),
    ("Treasure Hunting", "treasure.jpg"),
    ("Water Spider Monmon", "monmon.jpg"),
    ("Zen - Grogu and Dust Bunnies", "zen.jpg"),
];

/// Look up the curated hero asset for an exact display title.
#[must_use]
pub fn curated_asset(title: &str) -> Option<&'static str> {
    HERO_IMAGES
        .iter()
        .find(|(key, _)| *key == title)
        .map(|(_, file)| *file)
}

// =============================================================================
// IMAGE SOURCES
// =============================================================================

/// The resolved reference the renderer should use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImageSource {
    /// A same-origin relay reference embedding the remote URL, plus a
    /// client-side fallback to use if the relay itself fails at render time.
    Relay { src: String, fallback: String },
    /// A curated local hero asset.
    Curated { src: String },
    /// The generic placeholder.
    Placeholder { src: String },
}

impl ImageSource {
    /// The path or URL to render.
    #[must_use]
    pub fn src(&self) -> &str {
        match self {
            Self::Relay { src, .. } | Self::Curated { src } | Self::Placeholder { src } => src,
        }
    }
}

// =============================================================================
// RESOLVER
// =============================================================================

/// Resolves display images. All paths come from configuration at
/// construction time; nothing is read from ambient process state.
#[derive(Debug, Clone)]
pub struct ImageResolver {
    relay_path: String,
    hero_dir: String,
    placeholder: String,
    hero_fallback: String,
}

impl ImageResolver {
    #[must_use]
    pub fn new(
        relay_path: impl Into<String>,
        hero_dir: impl Into<String>,
        placeholder: impl Into<String>,
        hero_fallback: impl Into<String>,
    ) -> Self {
        Self {
            relay_path: relay_path.into(),
            hero_dir: hero_dir.into(),
            placeholder: placeholder.into(),
            hero_fallback: hero_fallback.into(),
        }
    }

    /// Resolve the image for an entity.
    ///
    /// `fallback_key` is the entity's exact display title; it selects a
    /// curated local asset when no remote URL is available.
    #[must_use]
    pub fn resolve(&self, remote_url: &str, fallback_key: &str) -> ImageSource {
        if !remote_url.is_empty() {
            let encoded = utf8_percent_encode(remote_url, NON_ALPHANUMERIC);
            return ImageSource::Relay {
                src: format!("{}?url={}", self.relay_path, encoded),
                fallback: self.placeholder.clone(),
            };
        }
        match curated_asset(fallback_key) {
            Some(file) => ImageSource::Curated {
                src: format!("{}/{}", self.hero_dir, file),
            },
            None => ImageSource::Placeholder {
                src: self.placeholder.clone(),
            },
        }
    }

    /// Convenience for optional poster fields.
    #[must_use]
    pub fn resolve_opt(&self, remote_url: Option<&str>, fallback_key: &str) -> ImageSource {
        self.resolve(remote_url.unwrap_or(""), fallback_key)
    }

    /// Hero banner for a detail page: curated asset for the exact title, or
    /// the hero fallback. Hero banners never go through the relay.
    #[must_use]
    pub fn hero(&self, title: &str) -> ImageSource {
        match curated_asset(title) {
            Some(file) => ImageSource::Curated {
                src: format!("{}/{}", self.hero_dir, file),
            },
            None => ImageSource::Placeholder {
                src: self.hero_fallback.clone(),
            },
        }
    }

    /// The generic placeholder path.
    #[must_use]
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn resolver() -> ImageResolver {
        ImageResolver::new(
            "/image",
            "assets/hero",
            "assets/no-image.png",
            "assets/default-hero.jpg",
        )
    }

    #[test]
    fn remote_url_becomes_a_relay_reference() {
        let source = resolver().resolve("http://x/y.jpg", "anything");
        match source {
            ImageSource::Relay { src, fallback } => {
                assert_eq!(src, "/image?url=http%3A%2F%2Fx%2Fy%2Ejpg");
                assert_eq!(fallback, "assets/no-image.png");
            }
            other => panic!("expected relay, got {other:?}"),
        }
    }

    #[test]
    fn curated_title_resolves_to_local_asset() {
        let source = resolver().resolve("", "Castle in the Sky");
        assert_eq!(
            source,
            ImageSource::Curated {
                src: "assets/hero/castle.jpg".to_string()
            }
        );
    }

    #[test]
    fn unknown_title_resolves_to_placeholder() {
        let source = resolver().resolve("", "Unknown Title");
        assert_eq!(
            source,
            ImageSource::Placeholder {
                src: "assets/no-image.png".to_string()
            }
        );
    }

    #[test]
    fn hero_falls_back_to_the_hero_asset() {
        let resolver = resolver();
        assert_eq!(resolver.hero("Ponyo").src(), "assets/hero/ponyo.jpg");
        assert_eq!(resolver.hero("Unknown Title").src(), "assets/default-hero.jpg");
    }

    #[test]
    fn relay_reference_is_fully_encoded() {
        let source = resolver().resolve("https://img.example/a b?c=d&e=f", "x");
        let src = source.src().to_string();
        // Everything after `url=` must be a single opaque parameter value.
        let (_, param) = src.split_once("url=").expect("relay parameter");
        assert!(!param.contains('&'));
        assert!(!param.contains('?'));
        assert!(!param.contains(' '));
    }
}
