//! Authenticated REST client shared by the Sonarr and Radarr integrations.
//!
//! Every request carries the API key as an `apikey` query parameter, and
//! paths are resolved against `<base>/api/v3/`.

use crate::error::{McparrError, Result};
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use tracing::{debug, instrument};
use url::Url;

const API_PREFIX: &str = "api/v3/";

/// Longest slice of an error body we keep in error messages.
const MAX_ERROR_BODY: usize = 512;

/// Thin REST client bound to one base URL and one API key.
#[derive(Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl RestClient {
    /// Create a client for the service at `base_url`.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("mcparr/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| McparrError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Self::with_http_client(http, base_url, api_key)
    }

    /// Create a client reusing an existing reqwest client.
    pub fn with_http_client(http: reqwest::Client, base_url: &str, api_key: &str) -> Result<Self> {
        let base_url = Url::parse(&format!("{}/{}", base_url.trim_end_matches('/'), API_PREFIX))?;

        Ok(Self {
            http,
            base_url,
            api_key: api_key.to_string(),
        })
    }

    /// The resolved API root, e.g. `http://localhost:8989/api/v3/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// GET `path` with extra query parameters.
    #[instrument(skip(self, params), level = "debug")]
    pub async fn get(&self, path: &str, params: &[(&str, &str)]) -> Result<Vec<u8>> {
        let request = self.request(Method::GET, path)?.query(params);
        self.send(Method::GET, path, request).await
    }

    /// POST a JSON body to `path`.
    #[instrument(skip(self, body), level = "debug")]
    pub async fn post<B>(&self, path: &str, body: &B) -> Result<Vec<u8>>
    where
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::POST, path)?.json(body);
        self.send(Method::POST, path, request).await
    }

    /// DELETE `path`, sending a JSON body.
    #[instrument(skip(self, body), level = "debug")]
    pub async fn delete<B>(&self, path: &str, body: &B) -> Result<Vec<u8>>
    where
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::DELETE, path)?.json(body);
        self.send(Method::DELETE, path, request).await
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.base_url.join(path.trim_start_matches('/'))?;
        Ok(self
            .http
            .request(method, url)
            .query(&[("apikey", self.api_key.as_str())]))
    }

    async fn send(&self, method: Method, path: &str, request: RequestBuilder) -> Result<Vec<u8>> {
        let response = request.send().await.map_err(|e| McparrError::Remote {
            status: None,
            message: format!("{} {} failed: {}", method, path, e),
        })?;

        let status = response.status();
        debug!(%method, path, status = status.as_u16(), "Response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(McparrError::Remote {
                status: Some(status.as_u16()),
                message: format!(
                    "{} {} returned {}: {}",
                    method,
                    path,
                    status,
                    truncate(body.trim(), MAX_ERROR_BODY)
                ),
            });
        }

        let bytes = response.bytes().await.map_err(|e| McparrError::Remote {
            status: Some(status.as_u16()),
            message: format!("{} {} body could not be read: {}", method, path, e),
        })?;

        Ok(bytes.to_vec())
    }
}

/// Truncate text with ellipsis, respecting char boundaries.
fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}
