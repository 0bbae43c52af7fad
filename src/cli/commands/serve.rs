//! Serve command implementation.

use crate::config::Settings;
use crate::mcp::McpServer;
use crate::tools::MediaTools;
use anyhow::Result;

/// Run the MCP server on stdio.
pub async fn run_serve(settings: Settings) -> Result<()> {
    let tools = MediaTools::from_settings(&settings)?;
    McpServer::new(tools).run().await
}
