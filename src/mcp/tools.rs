//! MCP tool definitions for mcparr.

use super::protocol::Tool;
use crate::tools::{REQUEST_DOWNLOAD, SEARCH_BY_GENRE, SEARCH_MEDIA_ID};
use serde_json::json;

/// Get all available tools.
pub fn get_tools() -> Vec<Tool> {
    vec![
        Tool {
            name: SEARCH_MEDIA_ID.to_string(),
            description: "Search for media ID by name. Returns the catalog ID of the best match, \
                which request_download needs."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "type": {
                        "type": "string",
                        "description": "The type of media to search for",
                        "enum": ["movie", "series"]
                    },
                    "name": {
                        "type": "string",
                        "description": "The name of media to find"
                    }
                },
                "required": ["type", "name"]
            }),
        },
        Tool {
            name: SEARCH_BY_GENRE.to_string(),
            description: "Search for media by genre or similar content. Results are drawn from \
                a handful of popular titles, or from titles matching similar_to when given."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "type": {
                        "type": "string",
                        "description": "The type of media to search for",
                        "enum": ["movie", "series"]
                    },
                    "genre": {
                        "type": "string",
                        "description": "The genre to search for (e.g. action, comedy, drama)"
                    },
                    "similar_to": {
                        "type": "string",
                        "description": "Find content similar to this title (optional)"
                    },
                    "limit": {
                        "type": "integer",
                        "description": "Maximum number of results to return",
                        "default": 5
                    }
                },
                "required": ["type", "genre"]
            }),
        },
        Tool {
            name: REQUEST_DOWNLOAD.to_string(),
            description: "Request a download for a movie or TV show. Use search_media_id first \
                to get the ID."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "type": {
                        "type": "string",
                        "description": "The type of media to download",
                        "enum": ["movie", "series"]
                    },
                    "name": {
                        "type": "string",
                        "description": "The name of media to download"
                    },
                    "id": {
                        "type": "integer",
                        "description": "The ID of media to download"
                    }
                },
                "required": ["type", "name", "id"]
            }),
        },
    ]
}
