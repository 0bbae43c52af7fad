//! Media provider abstraction for mcparr.
//!
//! A provider is one *arr service (Sonarr for series, Radarr for movies)
//! seen through the same trait. The genre search lives on the trait so the
//! algorithm is written once for both services.

mod arr;
pub mod genre;

pub use arr::ArrProvider;
pub use genre::{GenreQuery, DEFAULT_GENRE_LIMIT, MAX_CANDIDATE_POOL};

use crate::error::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Kind of media a provider manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Series,
    Movie,
}

impl MediaKind {
    /// Wire name of the catalog ID field (`tvdbId` for Sonarr, `tmdbId` for Radarr).
    pub fn catalog_id_field(self) -> &'static str {
        match self {
            MediaKind::Series => "tvdbId",
            MediaKind::Movie => "tmdbId",
        }
    }

    /// Collection resource under `/api/v3/`.
    pub fn resource(self) -> &'static str {
        match self {
            MediaKind::Series => "series",
            MediaKind::Movie => "movie",
        }
    }

    /// Human name of the backing service.
    pub fn service_name(self) -> &'static str {
        match self {
            MediaKind::Series => "Sonarr",
            MediaKind::Movie => "Radarr",
        }
    }

    /// Plural label used in rendered results.
    pub fn plural(self) -> &'static str {
        match self {
            MediaKind::Series => "series",
            MediaKind::Movie => "movies",
        }
    }

    /// Well-known titles used to seed a genre search when no reference title is given.
    pub fn seed_titles(self) -> &'static [&'static str] {
        match self {
            MediaKind::Series => &[
                "Breaking Bad",
                "Game of Thrones",
                "Stranger Things",
                "The Office",
                "Friends",
            ],
            MediaKind::Movie => &[
                "Inception",
                "The Shawshank Redemption",
                "The Dark Knight",
                "Pulp Fiction",
                "Forrest Gump",
            ],
        }
    }
}

impl std::str::FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "series" => Ok(MediaKind::Series),
            "movie" => Ok(MediaKind::Movie),
            _ => Err(format!("Unsupported media type: {}", s)),
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.resource())
    }
}

/// A series or movie as reported by a provider's lookup endpoint.
///
/// `id` is the external catalog ID (TVDB for series, TMDB for movies) and is
/// only meaningful together with `kind`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    pub kind: MediaKind,
    pub id: i64,
    pub title: String,
    pub overview: Option<String>,
    pub genres: Vec<String>,
}

impl MediaItem {
    /// Item known only by title and catalog ID, as supplied by a download request.
    pub fn new(kind: MediaKind, id: i64, title: impl Into<String>) -> Self {
        Self {
            kind,
            id,
            title: title.into(),
            overview: None,
            genres: Vec::new(),
        }
    }

    /// Case-insensitive genre tag match.
    pub fn has_genre(&self, genre: &str) -> bool {
        let wanted = genre.to_lowercase();
        self.genres.iter().any(|g| g.to_lowercase() == wanted)
    }

    /// Body for the "add to collection" POST.
    pub fn download_body(&self, quality_profile_id: i64, root_folder_path: &str) -> Value {
        let mut body = self.identity_body();
        body.insert("qualityProfileId".to_string(), Value::from(quality_profile_id));
        body.insert(
            "rootFolderPath".to_string(),
            Value::from(root_folder_path.to_string()),
        );
        Value::Object(body)
    }

    /// `{title, <catalogIdField>}`, the minimal body identifying this item remotely.
    pub fn identity_body(&self) -> Map<String, Value> {
        let mut body = Map::new();
        body.insert("title".to_string(), Value::from(self.title.clone()));
        body.insert(
            self.kind.catalog_id_field().to_string(),
            Value::from(self.id),
        );
        body
    }
}

/// Sonarr lookup record.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SeriesRecord {
    tvdb_id: i64,
    title: String,
    #[serde(default)]
    overview: Option<String>,
    /// Absent and `null` both mean untagged.
    #[serde(default)]
    genres: Option<Vec<String>>,
}

impl From<SeriesRecord> for MediaItem {
    fn from(r: SeriesRecord) -> Self {
        Self {
            kind: MediaKind::Series,
            id: r.tvdb_id,
            title: r.title,
            overview: r.overview,
            genres: r.genres.unwrap_or_default(),
        }
    }
}

/// Radarr lookup record.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MovieRecord {
    tmdb_id: i64,
    title: String,
    #[serde(default)]
    overview: Option<String>,
    /// Absent and `null` both mean untagged.
    #[serde(default)]
    genres: Option<Vec<String>>,
}

impl From<MovieRecord> for MediaItem {
    fn from(r: MovieRecord) -> Self {
        Self {
            kind: MediaKind::Movie,
            id: r.tmdb_id,
            title: r.title,
            overview: r.overview,
            genres: r.genres.unwrap_or_default(),
        }
    }
}

/// Capability shared by the series and movie services.
#[async_trait]
pub trait MediaProvider: Send + Sync {
    /// Which kind of media this provider manages.
    fn kind(&self) -> MediaKind;

    /// Search the remote catalog by name. No matches is an empty vec, not an error.
    async fn lookup(&self, name: &str) -> Result<Vec<MediaItem>>;

    /// Ask the service to add and download `item`.
    async fn request_download(
        &self,
        item: &MediaItem,
        quality_profile_id: i64,
        root_folder_path: &str,
    ) -> Result<()>;

    /// Approximate genre search built on top of `lookup`.
    async fn search_by_genre(&self, query: &GenreQuery) -> Result<Vec<MediaItem>> {
        genre::search(self, query).await
    }
}
