//! CLI module for mcparr.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// mcparr - media requests for AI assistants
///
/// Serves Sonarr and Radarr search/download tools over the Model Context Protocol,
/// and lets you run the same tools from the shell.
#[derive(Parser, Debug)]
#[command(name = "mcparr")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "MCPARR_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the MCP server on stdio for AI assistant integration (Claude, etc.)
    Serve,

    /// Find the catalog ID of a series or movie
    Lookup {
        /// Media type
        #[arg(value_parser = ["series", "movie"])]
        media_type: String,

        /// Title to look up
        name: String,
    },

    /// Find series or movies by genre
    Genre {
        /// Media type
        #[arg(value_parser = ["series", "movie"])]
        media_type: String,

        /// Genre to match (case-insensitive)
        genre: String,

        /// Search among titles similar to this one instead of the built-in picks
        #[arg(short, long)]
        similar_to: Option<String>,

        /// Maximum number of results
        #[arg(short, long, default_value = "5")]
        limit: usize,
    },

    /// Ask Sonarr or Radarr to download a title
    Download {
        /// Media type
        #[arg(value_parser = ["series", "movie"])]
        media_type: String,

        /// Title of the media
        name: String,

        /// Catalog ID (TVDB for series, TMDB for movies)
        id: i64,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration (API keys masked)
    Show,

    /// Show configuration file path
    Path,

    /// Write the current configuration to the config file
    Init,
}
