//! mcparr CLI entry point.

use anyhow::Result;
use clap::Parser;
use mcparr::cli::{commands, Cli, Commands};
use mcparr::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging. stdout carries JSON-RPC in serve mode, so log to stderr.
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("mcparr={}", log_level)),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Execute command
    match &cli.command {
        Commands::Serve => {
            commands::run_serve(settings).await?;
        }

        Commands::Lookup { media_type, name } => {
            commands::run_lookup(media_type, name, settings).await?;
        }

        Commands::Genre {
            media_type,
            genre,
            similar_to,
            limit,
        } => {
            commands::run_genre(media_type, genre, similar_to.as_deref(), *limit, settings).await?;
        }

        Commands::Download { media_type, name, id } => {
            commands::run_download(media_type, name, *id, settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings)?;
        }
    }

    Ok(())
}
