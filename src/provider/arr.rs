//! Sonarr/Radarr provider over the v3 REST API.

use super::{MediaItem, MediaKind, MediaProvider, MovieRecord, SeriesRecord};
use crate::client::RestClient;
use crate::error::{McparrError, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};

/// One *arr service. The same type serves Sonarr (`MediaKind::Series`)
/// and Radarr (`MediaKind::Movie`); only wire field names and seed titles differ.
#[derive(Debug, Clone)]
pub struct ArrProvider {
    client: RestClient,
    kind: MediaKind,
}

impl ArrProvider {
    pub fn new(client: RestClient, kind: MediaKind) -> Self {
        Self { client, kind }
    }

    /// Sonarr provider.
    pub fn sonarr(base_url: &str, api_key: &str) -> Result<Self> {
        Ok(Self::new(RestClient::new(base_url, api_key)?, MediaKind::Series))
    }

    /// Radarr provider.
    pub fn radarr(base_url: &str, api_key: &str) -> Result<Self> {
        Ok(Self::new(RestClient::new(base_url, api_key)?, MediaKind::Movie))
    }

    /// Remove a series from Sonarr.
    ///
    /// Only Sonarr exposes this; a Radarr provider returns `Unsupported`.
    #[instrument(skip(self, item), fields(id = item.id))]
    pub async fn delete(&self, item: &MediaItem) -> Result<()> {
        if self.kind != MediaKind::Series {
            return Err(McparrError::Unsupported(format!(
                "{} does not support deleting {}",
                self.kind.service_name(),
                self.kind.plural()
            )));
        }
        self.ensure_kind(item)?;

        let path = format!("{}/{}", self.kind.resource(), item.id);
        self.client
            .delete(&path, &item.identity_body())
            .await
            .map_err(|e| with_context(e, &format!("failed to request {} delete", self.kind)))?;

        info!(title = %item.title, "Delete requested");
        Ok(())
    }

    fn ensure_kind(&self, item: &MediaItem) -> Result<()> {
        if item.kind != self.kind {
            return Err(McparrError::InvalidInput(format!(
                "{} item '{}' cannot be sent to {}",
                item.kind,
                item.title,
                self.kind.service_name()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl MediaProvider for ArrProvider {
    fn kind(&self) -> MediaKind {
        self.kind
    }

    #[instrument(skip(self), fields(kind = %self.kind))]
    async fn lookup(&self, name: &str) -> Result<Vec<MediaItem>> {
        let path = format!("{}/lookup", self.kind.resource());
        let data = self
            .client
            .get(&path, &[("term", name)])
            .await
            .map_err(|e| with_context(e, &format!("failed to lookup {}", self.kind)))?;

        let items = match self.kind {
            MediaKind::Series => decode::<SeriesRecord>(&data, self.kind)?,
            MediaKind::Movie => decode::<MovieRecord>(&data, self.kind)?,
        };

        debug!(count = items.len(), "Lookup complete");
        Ok(items)
    }

    #[instrument(skip(self, item), fields(kind = %self.kind, id = item.id))]
    async fn request_download(
        &self,
        item: &MediaItem,
        quality_profile_id: i64,
        root_folder_path: &str,
    ) -> Result<()> {
        self.ensure_kind(item)?;

        let body = item.download_body(quality_profile_id, root_folder_path);
        self.client
            .post(self.kind.resource(), &body)
            .await
            .map_err(|e| with_context(e, &format!("failed to request {} download", self.kind)))?;

        info!(title = %item.title, "Download requested");
        Ok(())
    }
}

fn decode<R>(data: &[u8], kind: MediaKind) -> Result<Vec<MediaItem>>
where
    R: DeserializeOwned + Into<MediaItem>,
{
    let records: Vec<R> = serde_json::from_slice(data)
        .map_err(|e| McparrError::Decode(format!("{} lookup response: {}", kind, e)))?;
    Ok(records.into_iter().map(Into::into).collect())
}

/// Prefix a remote error message, keeping its status.
fn with_context(err: McparrError, context: &str) -> McparrError {
    match err {
        McparrError::Remote { status, message } => McparrError::Remote {
            status,
            message: format!("{}: {}", context, message),
        },
        other => other,
    }
}
