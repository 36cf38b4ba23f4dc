//! Data structures and types for animestream
//!
//! Contains the shared models used across the application:
//! - **Series**: the static catalog entry describing the one offered show
//! - **EpisodeRef**: the opaque identifier selecting an episode's media
//! - **Route**: the two navigation destinations (`/` and `/watch/:episode`)

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Catalog Entry
// =============================================================================

/// The static catalog entry: one series, defined once, never mutated.
///
/// Injected into the views at construction; there is no global instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub title: String,
    pub description: String,
    /// Episode count; episode indices run from 1 to this value inclusive
    pub episodes: u32,
    /// Thumbnail image URI (displayed as a reference, never fetched)
    pub thumbnail: String,
    /// Rating as a decimal string, e.g. "4.8"
    pub rating: String,
    /// Ordered genre tags
    pub genres: Vec<String>,
}

impl Series {
    /// The built-in catalog entry used when no catalog file is configured
    pub fn builtin() -> Self {
        Self {
            title: "Demon Slayer".to_string(),
            description: "A young man fights demons to save his sister and avenge his family."
                .to_string(),
            episodes: 5,
            thumbnail:
                "https://images.unsplash.com/photo-1578632767115-351597cf2477?auto=format&fit=crop&w=800&q=80"
                    .to_string(),
            rating: "4.8".to_string(),
            genres: vec![
                "Action".to_string(),
                "Fantasy".to_string(),
                "Adventure".to_string(),
            ],
        }
    }

    /// Iterate episode references 1..=episodes in catalog order
    pub fn episode_refs(&self) -> impl Iterator<Item = EpisodeRef> + '_ {
        (1..=self.episodes).map(EpisodeRef::from_number)
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} episodes - ★ {}",
            self.title, self.episodes, self.rating
        )
    }
}

// =============================================================================
// Episode Reference
// =============================================================================

/// Opaque episode identifier, taken verbatim from the route segment.
///
/// Conventionally an integer in [1, episode count] but never validated
/// against catalog bounds: out-of-range values flow into the media locator
/// and come back as a playback error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EpisodeRef(String);

impl EpisodeRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn from_number(n: u32) -> Self {
        Self(n.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value, when the reference happens to be an integer
    pub fn number(&self) -> Option<u32> {
        self.0.parse().ok()
    }
}

impl fmt::Display for EpisodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EpisodeRef {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// =============================================================================
// Routes
// =============================================================================

/// The two navigation destinations, spelled as paths.
///
/// `/` is the catalog; `/watch/:episode` is the playback view with the
/// episode segment carried through opaque.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Catalog,
    Watch(EpisodeRef),
}

impl Route {
    /// Parse a path into a route. Returns None for paths outside the grammar.
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.trim();
        if path == "/" || path.is_empty() {
            return Some(Route::Catalog);
        }
        let rest = path.strip_prefix("/watch/")?;
        if rest.is_empty() || rest.contains('/') {
            return None;
        }
        Some(Route::Watch(EpisodeRef::new(rest)))
    }

    pub fn watch(episode: impl Into<EpisodeRef>) -> Self {
        Route::Watch(episode.into())
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Catalog => write!(f, "/"),
            Route::Watch(ep) => write!(f, "/watch/{}", ep),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
