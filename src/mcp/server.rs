/// MCP method dispatch and the stdio transport
///
/// `Dispatcher` answers JSON-RPC messages against the tool catalog and is
/// shared by every transport. `McpServer` drives it over stdin/stdout:
/// 1. Reads newline-delimited JSON-RPC messages from stdin
/// 2. Dispatches each one
/// 3. Writes the replies to stdout, one per line

use std::sync::Arc;

use jsonrpc_core::ErrorCode;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::mcp::protocol::*;
use crate::tools::ToolCatalog;
use crate::ServerError;

/// Answers MCP methods for one catalog
#[derive(Debug, Clone)]
pub struct Dispatcher {
    catalog: Arc<ToolCatalog>,
}

impl Dispatcher {
    pub fn new(catalog: Arc<ToolCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    /// Handle a raw JSON-RPC payload: a single message or a batch.
    ///
    /// Returns `None` when nothing needs to be sent back (notifications,
    /// client responses, or a batch made only of those).
    pub async fn handle_value(&self, payload: Value) -> Option<Value> {
        match payload {
            Value::Array(batch) if batch.is_empty() => Some(
                JsonRpcResponse::error(Value::Null, ErrorCode::InvalidRequest, "Invalid Request: empty batch")
                    .to_value(),
            ),
            Value::Array(batch) => {
                let mut replies = Vec::with_capacity(batch.len());
                for message in batch {
                    if let Some(reply) = self.handle_single(message).await {
                        replies.push(reply.to_value());
                    }
                }
                (!replies.is_empty()).then(|| Value::Array(replies))
            }
            message => self.handle_single(message).await.map(|reply| reply.to_value()),
        }
    }

    async fn handle_single(&self, message: Value) -> Option<JsonRpcResponse> {
        match IncomingMessage::parse(message) {
            Ok(IncomingMessage::Request(request)) => self.handle(request).await,
            Ok(IncomingMessage::Notification(notification)) => {
                debug!(method = %notification.method, "Received notification");
                None
            }
            Ok(IncomingMessage::Response(_)) => {
                debug!("Ignoring response sent by client");
                None
            }
            Err(invalid) => {
                warn!(error = ?invalid.error, "Rejected invalid JSON-RPC message");
                Some(invalid)
            }
        }
    }

    /// Handle one decoded request; notifications get no reply
    pub async fn handle(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let id = request.id.clone()?;

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id, request.params),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => self.handle_tools_list(id),
            "tools/call" => self.handle_tools_call(id, request.params).await,
            method => {
                debug!(method, "Unknown method");
                JsonRpcResponse::error(
                    id,
                    ErrorCode::MethodNotFound,
                    format!("Method '{}' not found", method),
                )
            }
        };
        Some(response)
    }

    /// Handle MCP initialization request
    fn handle_initialize(&self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let params = params
            .and_then(|p| serde_json::from_value::<InitializeParams>(p).ok())
            .unwrap_or_default();
        let version = negotiate_protocol_version(params.protocol_version.as_deref());

        match &params.client_info {
            Some(client) => info!(
                client = %client.name,
                client_version = client.version.as_deref().unwrap_or("unknown"),
                protocol_version = version,
                "MCP client connected"
            ),
            None => info!(protocol_version = version, "MCP client connected"),
        }

        match serde_json::to_value(InitializeResult::new(version)) {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(e) => JsonRpcResponse::error(id, ErrorCode::InternalError, e.to_string()),
        }
    }

    /// Handle tools/list request
    fn handle_tools_list(&self, id: Value) -> JsonRpcResponse {
        let tools = self.catalog.iter().map(|tool| ToolInfo::from(tool.as_ref())).collect::<Vec<_>>();

        match serde_json::to_value(tools) {
            Ok(tools) => JsonRpcResponse::success(id, json!({ "tools": tools })),
            Err(e) => JsonRpcResponse::error(id, ErrorCode::InternalError, e.to_string()),
        }
    }

    /// Handle tools/call request
    async fn handle_tools_call(&self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let params: ToolCallParams = match params {
            Some(params) => match serde_json::from_value(params) {
                Ok(p) => p,
                Err(e) => {
                    return JsonRpcResponse::error(
                        id,
                        ErrorCode::InvalidParams,
                        format!("Invalid parameters: {}", e),
                    );
                }
            },
            None => {
                return JsonRpcResponse::error(id, ErrorCode::InvalidParams, "Missing parameters");
            }
        };

        let name = params.name.clone();
        let envelope = self.catalog.call(&name, params.arguments()).await;
        JsonRpcResponse::success(id, envelope.to_value())
    }
}

/// MCP server speaking newline-delimited JSON-RPC over stdin/stdout
pub struct McpServer {
    dispatcher: Dispatcher,
}

impl McpServer {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Run until stdin is closed
    pub async fn run(&self) -> Result<(), ServerError> {
        info!(tools = self.dispatcher.catalog().len(), "Starting MCP server on stdio, waiting for JSON-RPC requests...");

        let stdin = tokio::io::stdin();
        let mut reader = BufReader::new(stdin);
        let mut stdout = tokio::io::stdout();

        let mut line = String::new();

        loop {
            line.clear();

            match reader.read_line(&mut line).await {
                Ok(0) => {
                    info!("MCP server shutting down (stdin closed)");
                    break;
                }
                Ok(_) => {
                    if let Some(response) = self.process_line(&line).await {
                        let response_str = serde_json::to_string(&response)?;

                        stdout.write_all(response_str.as_bytes()).await?;
                        stdout.write_all(b"\n").await?;
                        stdout.flush().await?;

                        debug!("Sent response: {}", response_str);
                    }
                }
                Err(e) => {
                    error!("Failed to read from stdin: {}", e);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Process a single line of JSON-RPC input
    pub async fn process_line(&self, line: &str) -> Option<Value> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("Processing request: {}", line);

        let payload: Value = match serde_json::from_str(line) {
            Ok(payload) => payload,
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                return Some(
                    JsonRpcResponse::error(Value::Null, ErrorCode::ParseError, format!("Invalid JSON: {}", e))
                        .to_value(),
                );
            }
        };

        self.dispatcher.handle_value(payload).await
    }
}
