//! CLI command implementations.

mod config;
mod serve;
mod tool;

pub use config::run_config;
pub use serve::run_serve;
pub use tool::{run_download, run_genre, run_lookup};
