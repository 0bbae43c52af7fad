//! Client-side genre search.
//!
//! Neither Sonarr nor Radarr can filter their lookup endpoint by genre, so we
//! gather a pool of candidates through plain lookups and filter it locally.
//! Results are approximate: a genre that never shows up among the seed titles
//! (or the single `similar_to` lookup) is never found.

use super::{MediaItem, MediaProvider};
use crate::error::Result;
use tracing::{debug, instrument};

/// Number of results returned when the caller gives no limit.
pub const DEFAULT_GENRE_LIMIT: usize = 5;

/// Seed lookups stop once the pool holds at least this many candidates.
pub const MAX_CANDIDATE_POOL: usize = 20;

/// Parameters for a genre search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreQuery {
    pub genre: String,
    /// Reference title; when set, its lookup result is the whole candidate pool.
    pub similar_to: Option<String>,
    pub limit: usize,
}

impl GenreQuery {
    pub fn new(genre: impl Into<String>) -> Self {
        Self {
            genre: genre.into(),
            similar_to: None,
            limit: DEFAULT_GENRE_LIMIT,
        }
    }

    /// Set the reference title. Blank titles are treated as absent.
    pub fn similar_to(mut self, title: Option<String>) -> Self {
        self.similar_to = title.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// Run a genre search against `provider`.
#[instrument(skip(provider), fields(kind = %provider.kind()))]
pub async fn search<P>(provider: &P, query: &GenreQuery) -> Result<Vec<MediaItem>>
where
    P: MediaProvider + ?Sized,
{
    let pool = candidate_pool(provider, query.similar_to.as_deref()).await?;
    debug!(candidates = pool.len(), "Filtering candidate pool");
    Ok(filter_by_genre(pool, &query.genre, query.limit))
}

/// Gather candidates either from one reference lookup or from the seed titles.
async fn candidate_pool<P>(provider: &P, similar_to: Option<&str>) -> Result<Vec<MediaItem>>
where
    P: MediaProvider + ?Sized,
{
    if let Some(title) = similar_to {
        return provider.lookup(title).await;
    }

    let mut pool = Vec::new();
    for seed in provider.kind().seed_titles() {
        match provider.lookup(seed).await {
            Ok(items) => pool.extend(items),
            Err(e) => {
                debug!(seed, error = %e, "Seed lookup failed, skipping");
            }
        }

        if pool.len() >= MAX_CANDIDATE_POOL {
            break;
        }
    }

    Ok(pool)
}

/// Keep candidates tagged with `genre` (case-insensitive), in pool order, up to `limit`.
pub fn filter_by_genre(pool: Vec<MediaItem>, genre: &str, limit: usize) -> Vec<MediaItem> {
    pool.into_iter()
        .filter(|item| item.has_genre(genre))
        .take(limit)
        .collect()
}
