//! Configuration module for mcparr.
//!
//! Settings come from a TOML file, overridden by environment variables.

mod settings;

pub use settings::{LibrarySettings, ServiceSettings, Settings};
