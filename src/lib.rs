//! mcparr - Sonarr and Radarr tools for AI assistants
//!
//! An MCP server that lets an AI assistant look up series and movies,
//! search them by genre, and ask Sonarr or Radarr to download them.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management (TOML file + environment)
//! - `client` - Authenticated REST client for the *arr v3 API
//! - `provider` - Sonarr/Radarr adapters and the genre search
//! - `tools` - Tool handlers: argument validation, dispatch, text rendering
//! - `mcp` - JSON-RPC 2.0 stdio transport for the tools
//! - `cli` - Command line interface
//!
//! # Example
//!
//! ```rust,no_run
//! use mcparr::config::Settings;
//! use mcparr::tools::MediaTools;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let tools = MediaTools::from_settings(&settings)?;
//!
//!     let args = json!({"type": "series", "name": "Breaking Bad"});
//!     println!("{}", tools.call("search_media_id", Some(&args)).await?);
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod mcp;
pub mod provider;
pub mod tools;

pub use error::{McparrError, Result};
