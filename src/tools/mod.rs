//! Tool handlers exposed to AI assistants.
//!
//! Each handler validates its arguments, picks the provider for the requested
//! media type and renders a short text answer. Failures come back as
//! `ToolError`, which the transport reports as an error result; nothing here
//! terminates the process.

mod args;

pub use args::ToolArgs;

use crate::config::{LibrarySettings, Settings};
use crate::error::{McparrError, Result};
use crate::provider::{
    ArrProvider, GenreQuery, MediaItem, MediaKind, MediaProvider, DEFAULT_GENRE_LIMIT,
};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

pub const SEARCH_MEDIA_ID: &str = "search_media_id";
pub const SEARCH_BY_GENRE: &str = "search_by_genre";
pub const REQUEST_DOWNLOAD: &str = "request_download";

/// Caller-visible failure of a tool call.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Missing or malformed argument.
    #[error("Invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    /// The remote service call failed.
    #[error("{context}: {source}")]
    Failed {
        context: String,
        #[source]
        source: McparrError,
    },

    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}

impl ToolError {
    fn invalid(field: &'static str) -> impl FnOnce(String) -> ToolError {
        move |reason| ToolError::Invalid { field, reason }
    }
}

/// Outcome of a tool call: rendered text or a caller-visible error.
pub type ToolResult = std::result::Result<String, ToolError>;

/// Values injected into every download request. Callers cannot override them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadDefaults {
    pub quality_profile_id: i64,
    pub shows_root_path: String,
    pub movies_root_path: String,
}

impl DownloadDefaults {
    pub fn root_folder(&self, kind: MediaKind) -> &str {
        match kind {
            MediaKind::Series => &self.shows_root_path,
            MediaKind::Movie => &self.movies_root_path,
        }
    }
}

impl From<&LibrarySettings> for DownloadDefaults {
    fn from(library: &LibrarySettings) -> Self {
        Self {
            quality_profile_id: library.default_quality_profile_id,
            shows_root_path: library.shows_root_path.clone(),
            movies_root_path: library.movies_root_path.clone(),
        }
    }
}

/// The media tools: search by name, search by genre, request a download.
#[derive(Clone)]
pub struct MediaTools {
    series: Arc<dyn MediaProvider>,
    movies: Arc<dyn MediaProvider>,
    defaults: DownloadDefaults,
}

impl MediaTools {
    pub fn new(
        series: Arc<dyn MediaProvider>,
        movies: Arc<dyn MediaProvider>,
        defaults: DownloadDefaults,
    ) -> Self {
        Self {
            series,
            movies,
            defaults,
        }
    }

    /// Build Sonarr and Radarr providers from validated settings.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        settings.validate()?;

        let series = ArrProvider::sonarr(&settings.sonarr.url, &settings.sonarr.api_key)?;
        let movies = ArrProvider::radarr(&settings.radarr.url, &settings.radarr.api_key)?;

        Ok(Self::new(
            Arc::new(series),
            Arc::new(movies),
            DownloadDefaults::from(&settings.library),
        ))
    }

    /// Names of the tools this handler set answers to.
    pub fn names() -> [&'static str; 3] {
        [SEARCH_MEDIA_ID, SEARCH_BY_GENRE, REQUEST_DOWNLOAD]
    }

    /// Dispatch a tool call by name.
    pub async fn call(&self, name: &str, arguments: Option<&Value>) -> ToolResult {
        let args = ToolArgs::new(arguments);
        match name {
            SEARCH_MEDIA_ID => self.search_media_id(&args).await,
            SEARCH_BY_GENRE => self.search_by_genre(&args).await,
            REQUEST_DOWNLOAD => self.request_download(&args).await,
            _ => Err(ToolError::UnknownTool(name.to_string())),
        }
    }

    /// Look a title up and report the catalog ID of the best match.
    pub async fn search_media_id(&self, args: &ToolArgs<'_>) -> ToolResult {
        let media_type = args.require_str("type").map_err(ToolError::invalid("media type"))?;
        let name = args
            .require_non_empty_str("name")
            .map_err(ToolError::invalid("media name"))?;

        info!(media_type, name, "Searching media ID");

        let Some(provider) = self.provider(media_type) else {
            return Ok(unsupported(media_type));
        };
        let kind = provider.kind();

        let items = provider.lookup(name).await.map_err(|e| {
            warn!(error = %e, "Lookup failed");
            ToolError::Failed {
                context: format!("Failed to fetch data from {}", kind.service_name()),
                source: e,
            }
        })?;

        Ok(match items.first() {
            Some(item) => {
                info!(title = %item.title, id = item.id, "Found {}", kind);
                format!("Found {} {} with ID: {}", kind.service_name(), kind, item.id)
            }
            None => {
                info!(name, "No {} found", kind);
                format!("No matching {} found in {}.", kind, kind.service_name())
            }
        })
    }

    /// Find titles tagged with a genre.
    pub async fn search_by_genre(&self, args: &ToolArgs<'_>) -> ToolResult {
        let media_type = args.require_str("type").map_err(ToolError::invalid("media type"))?;
        let genre = args
            .require_non_empty_str("genre")
            .map_err(ToolError::invalid("genre"))?;
        let similar_to = args
            .optional_str("similar_to")
            .map_err(ToolError::invalid("similar_to"))?;
        let limit = args
            .optional_int("limit", DEFAULT_GENRE_LIMIT as i64)
            .and_then(|l| usize::try_from(l).map_err(|_| "must not be negative".to_string()))
            .map_err(ToolError::invalid("limit"))?;

        info!(media_type, genre, similar_to, limit, "Searching by genre");

        let Some(provider) = self.provider(media_type) else {
            return Ok(unsupported(media_type));
        };
        let kind = provider.kind();

        let query = GenreQuery::new(genre)
            .similar_to(similar_to.map(str::to_string))
            .limit(limit);

        let items = provider.search_by_genre(&query).await.map_err(|e| {
            warn!(error = %e, "Genre search failed");
            ToolError::Failed {
                context: format!("Failed to search {} by genre", kind.plural()),
                source: e,
            }
        })?;

        info!(count = items.len(), genre, "Genre search complete");
        Ok(render_genre_results(kind, genre, &items))
    }

    /// Ask the service to add and download a title.
    ///
    /// Quality profile and root folder always come from configuration.
    pub async fn request_download(&self, args: &ToolArgs<'_>) -> ToolResult {
        let media_type = args.require_str("type").map_err(ToolError::invalid("media type"))?;
        let name = args
            .require_non_empty_str("name")
            .map_err(ToolError::invalid("media name"))?;
        let id = args.require_int("id").map_err(ToolError::invalid("media ID"))?;

        info!(media_type, name, id, "Requesting download");

        let Some(provider) = self.provider(media_type) else {
            return Ok(unsupported(media_type));
        };
        let kind = provider.kind();

        let item = MediaItem::new(kind, id, name);
        let quality_profile_id = self.defaults.quality_profile_id;
        let root_folder = self.defaults.root_folder(kind);

        info!(quality_profile_id, root_folder, "Using download defaults");

        provider
            .request_download(&item, quality_profile_id, root_folder)
            .await
            .map_err(|e| {
                warn!(error = %e, "Download request failed");
                ToolError::Failed {
                    context: format!("Failed to request download from {}", kind.service_name()),
                    source: e,
                }
            })?;

        info!(name, "Download requested");
        Ok(format!(
            "Download requested for {} {} with ID: {}",
            kind.service_name(),
            kind,
            id
        ))
    }

    fn provider(&self, media_type: &str) -> Option<&dyn MediaProvider> {
        match media_type.parse::<MediaKind>().ok()? {
            MediaKind::Series => Some(self.series.as_ref()),
            MediaKind::Movie => Some(self.movies.as_ref()),
        }
    }
}

fn unsupported(media_type: &str) -> String {
    warn!(media_type, "Unsupported media type");
    format!(
        "Unsupported media type: {}. Must be 'movie' or 'series'.",
        media_type
    )
}

fn render_genre_results(kind: MediaKind, genre: &str, items: &[MediaItem]) -> String {
    if items.is_empty() {
        return format!(
            "No {} found matching genre '{}'. Try a different genre such as 'drama', 'comedy', 'action', or 'thriller'.",
            kind.plural(),
            genre
        );
    }

    let mut output = format!(
        "Found {} {} matching genre '{}':\n",
        items.len(),
        kind.plural(),
        genre
    );
    for (i, item) in items.iter().enumerate() {
        output.push_str(&format!("{}. {} (ID: {})\n", i + 1, item.title, item.id));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::RestClient;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Clone, PartialEq)]
    struct DownloadCall {
        item: MediaItem,
        quality_profile_id: i64,
        root_folder_path: String,
    }

    /// In-memory provider: every lookup answers with `items`.
    struct FakeProvider {
        kind: MediaKind,
        items: Vec<MediaItem>,
        fail: bool,
        lookups: Mutex<Vec<String>>,
        downloads: Mutex<Vec<DownloadCall>>,
    }

    impl FakeProvider {
        fn new(kind: MediaKind, items: Vec<MediaItem>) -> Arc<Self> {
            Arc::new(Self {
                kind,
                items,
                fail: false,
                lookups: Mutex::new(Vec::new()),
                downloads: Mutex::new(Vec::new()),
            })
        }

        fn failing(kind: MediaKind) -> Arc<Self> {
            Arc::new(Self {
                kind,
                items: Vec::new(),
                fail: true,
                lookups: Mutex::new(Vec::new()),
                downloads: Mutex::new(Vec::new()),
            })
        }

        fn error() -> McparrError {
            McparrError::Remote {
                status: Some(503),
                message: "service unavailable".to_string(),
            }
        }
    }

    #[async_trait]
    impl MediaProvider for FakeProvider {
        fn kind(&self) -> MediaKind {
            self.kind
        }

        async fn lookup(&self, name: &str) -> Result<Vec<MediaItem>> {
            self.lookups.lock().unwrap().push(name.to_string());
            if self.fail {
                return Err(Self::error());
            }
            Ok(self.items.clone())
        }

        async fn request_download(
            &self,
            item: &MediaItem,
            quality_profile_id: i64,
            root_folder_path: &str,
        ) -> Result<()> {
            if self.fail {
                return Err(Self::error());
            }
            self.downloads.lock().unwrap().push(DownloadCall {
                item: item.clone(),
                quality_profile_id,
                root_folder_path: root_folder_path.to_string(),
            });
            Ok(())
        }
    }

    fn defaults() -> DownloadDefaults {
        DownloadDefaults {
            quality_profile_id: 10,
            shows_root_path: "/test/shows".to_string(),
            movies_root_path: "/test/movies".to_string(),
        }
    }

    fn tools(series: Arc<FakeProvider>, movies: Arc<FakeProvider>) -> MediaTools {
        MediaTools::new(series, movies, defaults())
    }

    fn item(kind: MediaKind, id: i64, title: &str, genres: &[&str]) -> MediaItem {
        let mut item = MediaItem::new(kind, id, title);
        item.genres = genres.iter().map(|g| g.to_string()).collect();
        item
    }

    #[tokio::test]
    async fn test_search_media_id_found() {
        let series = FakeProvider::new(
            MediaKind::Series,
            vec![
                item(MediaKind::Series, 81189, "Breaking Bad", &[]),
                item(MediaKind::Series, 273181, "Better Call Saul", &[]),
            ],
        );
        let tools = tools(series.clone(), FakeProvider::new(MediaKind::Movie, vec![]));

        let text = tools
            .call(SEARCH_MEDIA_ID, Some(&json!({"type": "series", "name": "Breaking Bad"})))
            .await
            .unwrap();

        assert_eq!(text, "Found Sonarr series with ID: 81189");
        assert_eq!(*series.lookups.lock().unwrap(), vec!["Breaking Bad".to_string()]);
    }

    #[tokio::test]
    async fn test_search_media_id_no_match_is_text() {
        let tools = tools(
            FakeProvider::new(MediaKind::Series, vec![]),
            FakeProvider::new(MediaKind::Movie, vec![]),
        );

        let series = tools
            .call(SEARCH_MEDIA_ID, Some(&json!({"type": "series", "name": "zzz"})))
            .await
            .unwrap();
        let movie = tools
            .call(SEARCH_MEDIA_ID, Some(&json!({"type": "movie", "name": "zzz"})))
            .await
            .unwrap();

        assert_eq!(series, "No matching series found in Sonarr.");
        assert_eq!(movie, "No matching movie found in Radarr.");
    }

    #[tokio::test]
    async fn test_unsupported_media_type_is_text_for_every_tool() {
        let series = FakeProvider::new(MediaKind::Series, vec![]);
        let movies = FakeProvider::new(MediaKind::Movie, vec![]);
        let tools = tools(series.clone(), movies.clone());

        let calls = [
            (SEARCH_MEDIA_ID, json!({"type": "anime", "name": "Naruto"})),
            (SEARCH_BY_GENRE, json!({"type": "anime", "genre": "action"})),
            (REQUEST_DOWNLOAD, json!({"type": "anime", "name": "Naruto", "id": 1})),
        ];
        for (name, args) in calls {
            let text = tools.call(name, Some(&args)).await.unwrap();
            assert_eq!(
                text,
                "Unsupported media type: anime. Must be 'movie' or 'series'."
            );
        }

        assert!(series.lookups.lock().unwrap().is_empty());
        assert!(movies.downloads.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_validation_errors() {
        let tools = tools(
            FakeProvider::new(MediaKind::Series, vec![]),
            FakeProvider::new(MediaKind::Movie, vec![]),
        );

        let err = tools.call(SEARCH_MEDIA_ID, None).await.unwrap_err();
        assert!(matches!(err, ToolError::Invalid { field: "media type", .. }));

        let err = tools
            .call(SEARCH_BY_GENRE, Some(&json!({"type": "movie"})))
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Invalid genre:"), "{}", err);

        let err = tools
            .call(REQUEST_DOWNLOAD, Some(&json!({"type": "movie", "name": "Dune", "id": "abc"})))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid media ID: argument 'id' must be an integer");

        let err = tools
            .call(SEARCH_BY_GENRE, Some(&json!({"type": "movie", "genre": "drama", "limit": -1})))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Invalid { field: "limit", .. }));
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let tools = tools(
            FakeProvider::new(MediaKind::Series, vec![]),
            FakeProvider::new(MediaKind::Movie, vec![]),
        );
        let err = tools.call("delete_media", None).await.unwrap_err();
        assert_eq!(err.to_string(), "Unknown tool: delete_media");
    }

    #[tokio::test]
    async fn test_search_by_genre_renders_list() {
        let movies = FakeProvider::new(
            MediaKind::Movie,
            vec![
                item(MediaKind::Movie, 27205, "Inception", &["Action", "Science Fiction"]),
                item(MediaKind::Movie, 155, "The Dark Knight", &["Drama", "Action"]),
                item(MediaKind::Movie, 13, "Forrest Gump", &["Comedy", "Drama"]),
            ],
        );
        let tools = tools(FakeProvider::new(MediaKind::Series, vec![]), movies.clone());

        let text = tools
            .call(
                SEARCH_BY_GENRE,
                Some(&json!({"type": "movie", "genre": "action", "similar_to": "Inception"})),
            )
            .await
            .unwrap();

        assert_eq!(
            text,
            "Found 2 movies matching genre 'action':\n1. Inception (ID: 27205)\n2. The Dark Knight (ID: 155)\n"
        );
        assert_eq!(*movies.lookups.lock().unwrap(), vec!["Inception".to_string()]);
    }

    #[tokio::test]
    async fn test_search_by_genre_respects_limit_and_default() {
        let many: Vec<_> = (0..10)
            .map(|i| item(MediaKind::Series, i, &format!("Show {}", i), &["Drama"]))
            .collect();
        let tools = tools(
            FakeProvider::new(MediaKind::Series, many),
            FakeProvider::new(MediaKind::Movie, vec![]),
        );

        let text = tools
            .call(SEARCH_BY_GENRE, Some(&json!({"type": "series", "genre": "drama", "limit": 2})))
            .await
            .unwrap();
        assert!(text.starts_with("Found 2 series"), "{}", text);

        let text = tools
            .call(SEARCH_BY_GENRE, Some(&json!({"type": "series", "genre": "Drama"})))
            .await
            .unwrap();
        assert!(text.starts_with("Found 5 series"), "{}", text);
    }

    #[tokio::test]
    async fn test_search_by_genre_no_results() {
        let tools = tools(
            FakeProvider::new(MediaKind::Series, vec![item(MediaKind::Series, 1, "A", &["Drama"])]),
            FakeProvider::new(MediaKind::Movie, vec![]),
        );

        let text = tools
            .call(SEARCH_BY_GENRE, Some(&json!({"type": "series", "genre": "western"})))
            .await
            .unwrap();

        assert!(text.starts_with("No series found matching genre 'western'."));
    }

    #[tokio::test]
    async fn test_request_download_injects_configured_defaults() {
        let series = FakeProvider::new(MediaKind::Series, vec![]);
        let movies = FakeProvider::new(MediaKind::Movie, vec![]);
        let tools = tools(series.clone(), movies.clone());

        // Caller-supplied quality/root keys are ignored.
        let text = tools
            .call(
                REQUEST_DOWNLOAD,
                Some(&json!({
                    "type": "movie",
                    "name": "Inception",
                    "id": 27205.0,
                    "qualityProfileId": 1,
                    "rootFolderPath": "/elsewhere"
                })),
            )
            .await
            .unwrap();
        assert_eq!(text, "Download requested for Radarr movie with ID: 27205");

        tools
            .call(REQUEST_DOWNLOAD, Some(&json!({"type": "series", "name": "Friends", "id": 79168})))
            .await
            .unwrap();

        assert_eq!(
            *movies.downloads.lock().unwrap(),
            vec![DownloadCall {
                item: MediaItem::new(MediaKind::Movie, 27205, "Inception"),
                quality_profile_id: 10,
                root_folder_path: "/test/movies".to_string(),
            }]
        );
        assert_eq!(
            *series.downloads.lock().unwrap(),
            vec![DownloadCall {
                item: MediaItem::new(MediaKind::Series, 79168, "Friends"),
                quality_profile_id: 10,
                root_folder_path: "/test/shows".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_remote_failures_are_wrapped() {
        let tools = tools(
            FakeProvider::failing(MediaKind::Series),
            FakeProvider::failing(MediaKind::Movie),
        );

        let err = tools
            .call(REQUEST_DOWNLOAD, Some(&json!({"type": "series", "name": "Friends", "id": 1})))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to request download from Sonarr: service unavailable"
        );

        let err = tools
            .call(SEARCH_BY_GENRE, Some(&json!({"type": "movie", "genre": "drama", "similar_to": "Heat"})))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to search movies by genre: service unavailable");
    }

    #[tokio::test]
    async fn test_http_500_is_error_result_and_next_call_still_works() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/series/lookup"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v3/movie/lookup"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{"tmdbId": 27205, "title": "Inception"}])),
            )
            .mount(&server)
            .await;

        let client = RestClient::new(&server.uri(), "key").unwrap();
        let tools = MediaTools::new(
            Arc::new(ArrProvider::new(client.clone(), MediaKind::Series)),
            Arc::new(ArrProvider::new(client, MediaKind::Movie)),
            defaults(),
        );

        let err = tools
            .call(SEARCH_MEDIA_ID, Some(&json!({"type": "series", "name": "Lost"})))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to fetch data"), "{}", err);

        let text = tools
            .call(SEARCH_MEDIA_ID, Some(&json!({"type": "movie", "name": "Inception"})))
            .await
            .unwrap();
        assert_eq!(text, "Found Radarr movie with ID: 27205");
    }

    #[test]
    fn test_from_settings_requires_api_keys() {
        let mut settings = Settings::default();
        assert!(MediaTools::from_settings(&settings).is_err());

        settings.sonarr.api_key = "s".to_string();
        settings.radarr.api_key = "r".to_string();
        assert!(MediaTools::from_settings(&settings).is_ok());
    }

    #[test]
    fn test_defaults_from_library_settings() {
        let library = LibrarySettings::default();
        let defaults = DownloadDefaults::from(&library);

        assert_eq!(defaults.quality_profile_id, 6);
        assert_eq!(defaults.root_folder(MediaKind::Series), "/media/library/shows");
        assert_eq!(defaults.root_folder(MediaKind::Movie), "/media/library/movies");
    }
}
