//! Configuration settings for mcparr.

use crate::error::{McparrError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub sonarr: ServiceSettings,
    pub radarr: ServiceSettings,
    pub library: LibrarySettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sonarr: ServiceSettings::with_url("http://localhost:8989"),
            radarr: ServiceSettings::with_url("http://localhost:7878"),
            library: LibrarySettings::default(),
        }
    }
}

/// Connection settings for one *arr service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Base URL of the service, without the `/api/v3` suffix.
    pub url: String,
    /// API key from the service's Settings > General page.
    pub api_key: String,
}

impl ServiceSettings {
    fn with_url(url: &str) -> Self {
        Self {
            url: url.to_string(),
            api_key: String::new(),
        }
    }
}

/// Where downloaded media lands and at which quality.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Root folder Sonarr should place new series in.
    pub shows_root_path: String,
    /// Root folder Radarr should place new movies in.
    pub movies_root_path: String,
    /// Quality profile applied to every download request.
    pub default_quality_profile_id: i64,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            shows_root_path: "/media/library/shows".to_string(),
            movies_root_path: "/media/library/movies".to_string(),
            default_quality_profile_id: 6,
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file, then apply the environment.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    ///
    /// A missing file is not an error; defaults are used instead.
    /// Environment variables always win over the file.
    pub fn load_from(path: Option<&PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => Self::expand_path(&p.to_string_lossy()),
            None => Self::default_config_path(),
        };

        let mut settings = if config_path.exists() {
            Self::from_toml(&std::fs::read_to_string(&config_path)?)?
        } else {
            Settings::default()
        };

        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Parse settings from TOML text.
    ///
    /// A service section without `url` falls back to that service's default URL.
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut settings: Settings = toml::from_str(content)?;
        let defaults = Settings::default();
        if settings.sonarr.url.trim().is_empty() {
            settings.sonarr.url = defaults.sonarr.url;
        }
        if settings.radarr.url.trim().is_empty() {
            settings.radarr.url = defaults.radarr.url;
        }
        Ok(settings)
    }

    /// Override fields from environment-style lookups. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("SONARR_URL") {
            self.sonarr.url = v;
        }
        if let Some(v) = get("SONARR_API_KEY") {
            self.sonarr.api_key = v;
        }
        if let Some(v) = get("RADARR_URL") {
            self.radarr.url = v;
        }
        if let Some(v) = get("RADARR_API_KEY") {
            self.radarr.api_key = v;
        }
        if let Some(v) = get("SHOWS_ROOT_PATH") {
            self.library.shows_root_path = v;
        }
        if let Some(v) = get("MOVIES_ROOT_PATH") {
            self.library.movies_root_path = v;
        }
        if let Some(v) = get("DEFAULT_QUALITY_PROFILE_ID") {
            match v.trim().parse::<i64>() {
                Ok(id) => self.library.default_quality_profile_id = id,
                Err(_) => warn!(
                    value = %v,
                    "Ignoring non-numeric DEFAULT_QUALITY_PROFILE_ID, keeping {}",
                    self.library.default_quality_profile_id
                ),
            }
        }
    }

    /// Check that everything needed to talk to both services is present.
    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();
        if self.sonarr.api_key.trim().is_empty() {
            missing.push("SONARR_API_KEY");
        }
        if self.radarr.api_key.trim().is_empty() {
            missing.push("RADARR_API_KEY");
        }

        if !missing.is_empty() {
            return Err(McparrError::Config(format!(
                "Missing {} (set in the environment or the config file)",
                missing.join(" and ")
            )));
        }

        Ok(())
    }

    /// Copy of the settings safe to print: API keys are masked.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.sonarr.api_key = mask(&copy.sonarr.api_key);
        copy.radarr.api_key = mask(&copy.radarr.api_key);
        copy
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| McparrError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mcparr")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }
}

fn mask(key: &str) -> String {
    if key.is_empty() {
        String::new()
    } else {
        "********".to_string()
    }
}
