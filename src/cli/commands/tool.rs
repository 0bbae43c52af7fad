//! One-shot tool commands: lookup, genre, download.

use crate::cli::Output;
use crate::config::Settings;
use crate::tools::{MediaTools, REQUEST_DOWNLOAD, SEARCH_BY_GENRE, SEARCH_MEDIA_ID};
use anyhow::Result;
use serde_json::{json, Value};

/// Run the lookup command.
pub async fn run_lookup(media_type: &str, name: &str, settings: Settings) -> Result<()> {
    let args = json!({ "type": media_type, "name": name });
    run_tool(SEARCH_MEDIA_ID, args, &settings).await
}

/// Run the genre command.
pub async fn run_genre(
    media_type: &str,
    genre: &str,
    similar_to: Option<&str>,
    limit: usize,
    settings: Settings,
) -> Result<()> {
    let args = json!({
        "type": media_type,
        "genre": genre,
        "similar_to": similar_to,
        "limit": limit,
    });
    run_tool(SEARCH_BY_GENRE, args, &settings).await
}

/// Run the download command.
pub async fn run_download(media_type: &str, name: &str, id: i64, settings: Settings) -> Result<()> {
    Output::info(&format!(
        "Requesting {} '{}' (quality profile {})",
        media_type, name, settings.library.default_quality_profile_id
    ));
    let args = json!({ "type": media_type, "name": name, "id": id });
    run_tool(REQUEST_DOWNLOAD, args, &settings).await
}

async fn run_tool(name: &str, args: Value, settings: &Settings) -> Result<()> {
    let tools = MediaTools::from_settings(settings)?;

    match tools.call(name, Some(&args)).await {
        Ok(text) => {
            Output::tool_text(&text);
            Ok(())
        }
        Err(e) => {
            Output::error(&e.to_string());
            Err(e.into())
        }
    }
}
