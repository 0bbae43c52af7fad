//! Error types for mcparr.

use thiserror::Error;

/// Library-level error type for mcparr operations.
#[derive(Error, Debug)]
pub enum McparrError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport failure or non-2xx status from Sonarr/Radarr.
    #[error("{message}")]
    Remote {
        status: Option<u16>,
        message: String,
    },

    /// The remote answered 2xx but the body was not what we expected.
    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl McparrError {
    /// HTTP status carried by a remote failure, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            McparrError::Remote { status, .. } => *status,
            _ => None,
        }
    }
}

/// Result type alias for mcparr operations.
pub type Result<T> = std::result::Result<T, McparrError>;
