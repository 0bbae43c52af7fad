//! MCP (Model Context Protocol) server for mcparr.
//!
//! Exposes the media tools to AI assistants like Claude.
//! Implements JSON-RPC 2.0 over stdio.

mod protocol;
mod server;
mod tools;

pub use server::McpServer;
