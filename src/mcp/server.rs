//! MCP server implementation.

use super::protocol::*;
use super::tools::get_tools;
use crate::tools::MediaTools;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

const PROTOCOL_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "mcparr";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// MCP Server for mcparr.
pub struct McpServer {
    tools: MediaTools,
}

impl McpServer {
    /// Create a new MCP server.
    pub fn new(tools: MediaTools) -> Self {
        Self { tools }
    }

    /// Run the MCP server (reads from stdin, writes to stdout).
    pub async fn run(self) -> anyhow::Result<()> {
        info!("mcparr MCP server starting on stdio");
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serve newline-delimited JSON-RPC from `reader`, answering on `writer`.
    ///
    /// Tool calls run concurrently; all responses go through one writer task
    /// so lines never interleave. Returns once `reader` hits EOF and every
    /// in-flight call has answered. If writing fails, stops reading and
    /// returns the write error.
    pub async fn serve<R, W>(self, reader: R, writer: W) -> anyhow::Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel::<JsonRpcResponse>();
        let writer_task = tokio::spawn(write_responses(rx, writer));
        let mut in_flight = JoinSet::new();

        let mut lines = BufReader::new(reader).lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if tx.is_closed() {
                warn!("Output closed, no longer accepting requests");
                break;
            }

            let value: Value = match serde_json::from_str(line) {
                Ok(value) => value,
                Err(e) => {
                    warn!("Failed to parse request: {}", e);
                    if tx.send(JsonRpcResponse::error(None, PARSE_ERROR, "Parse error")).is_err() {
                        break;
                    }
                    continue;
                }
            };

            let request = match JsonRpcRequest::from_value(value) {
                Ok(request) => request,
                Err(response) => {
                    warn!("Invalid request received");
                    if tx.send(response).is_err() {
                        break;
                    }
                    continue;
                }
            };

            debug!(method = %request.method, "Request received");

            if request.method == "tools/call" {
                let tools = self.tools.clone();
                let tx = tx.clone();
                in_flight.spawn(async move {
                    let notification = request.is_notification();
                    let response = handle_tools_call(&tools, request.id, request.params).await;
                    if !notification && tx.send(response).is_err() {
                        warn!("Output closed, dropping tool call response");
                    }
                });
            } else if let Some(response) = self.handle_request(request) {
                if tx.send(response).is_err() {
                    break;
                }
            }

            while let Some(finished) = in_flight.try_join_next() {
                log_join_error(finished);
            }
        }

        while let Some(finished) = in_flight.join_next().await {
            log_join_error(finished);
        }

        drop(tx);
        writer_task.await??;
        info!("Input closed, MCP server stopping");
        Ok(())
    }

    /// Handle a request that does not touch the remote services.
    fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            debug!(method = %request.method, "Notification received");
            return None;
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id),
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            "tools/list" => self.handle_tools_list(request.id),
            _ => JsonRpcResponse::error(
                request.id,
                METHOD_NOT_FOUND,
                &format!("Method not found: {}", request.method),
            ),
        };
        Some(response)
    }

    /// Handle initialize request.
    fn handle_initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability { list_changed: false },
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
        };

        JsonRpcResponse::from_result(id, &result)
    }

    /// Handle tools/list request.
    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        JsonRpcResponse::from_result(id, &ToolsListResult { tools: get_tools() })
    }
}

/// Handle tools/call request.
async fn handle_tools_call(
    tools: &MediaTools,
    id: Option<Value>,
    params: Option<Value>,
) -> JsonRpcResponse {
    let params: ToolCallParams = match params {
        Some(p) => match serde_json::from_value(p) {
            Ok(params) => params,
            Err(e) => {
                return JsonRpcResponse::error(id, INVALID_PARAMS, &format!("Invalid params: {}", e))
            }
        },
        None => return JsonRpcResponse::error(id, INVALID_PARAMS, "Missing params"),
    };

    let result = match tools.call(&params.name, params.arguments.as_ref()).await {
        Ok(text) => ToolCallResult::text(text),
        Err(e) => ToolCallResult::error(e.to_string()),
    };

    JsonRpcResponse::from_result(id, &result)
}

async fn write_responses<W>(
    mut rx: mpsc::UnboundedReceiver<JsonRpcResponse>,
    mut writer: W,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(response) = rx.recv().await {
        let mut line = serde_json::to_string(&response)?;
        line.push('\n');
        writer.write_all(line.as_bytes()).await?;
        writer.flush().await?;
    }
    Ok(())
}

fn log_join_error(result: Result<(), tokio::task::JoinError>) {
    if let Err(e) = result {
        error!("Tool call task failed: {}", e);
    }
}
