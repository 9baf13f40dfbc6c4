/// MCP (Model Context Protocol) message structures and JSON-RPC handling
///
/// This module defines the JSON-RPC message format shared by the stdio,
/// Streamable HTTP and legacy SSE transports.

use jsonrpc_core::ErrorCode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::tools::{ToolAnnotations, ToolDefinition};

/// Protocol versions we can speak, newest first
pub const SUPPORTED_PROTOCOL_VERSIONS: [&str; 3] = ["2025-06-18", "2025-03-26", "2024-11-05"];

/// Version offered when the client asks for one we don't know
pub const LATEST_PROTOCOL_VERSION: &str = SUPPORTED_PROTOCOL_VERSIONS[0];

/// Name reported in `serverInfo`
pub const SERVER_NAME: &str = "dokploy";

pub const JSONRPC_VERSION: &str = "2.0";

/// Error code for session-level protocol failures
pub const SESSION_ERROR: ErrorCode = ErrorCode::ServerError(-32000);

/// JSON-RPC 2.0 request or notification
///
/// A message without an `id` is a notification and never gets a reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    pub fn new(id: impl Into<Value>, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: Some(id.into()),
            method: method.into(),
            params,
        }
    }

    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// JSON-RPC 2.0 response message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    /// Request ID that we're responding to (`null` when it could not be read)
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    /// Create a successful response
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response
    pub fn error(id: Value, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code: code.code(),
                message: message.into(),
                data: None,
            }),
        }
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| {
            json!({
                "jsonrpc": JSONRPC_VERSION,
                "error": {"code": ErrorCode::InternalError.code(), "message": "Internal server error"},
                "id": null
            })
        })
    }
}

/// One decoded inbound JSON-RPC message
#[derive(Debug, Clone)]
pub enum IncomingMessage {
    Request(JsonRpcRequest),
    Notification(JsonRpcRequest),
    /// A response the client sends back; we never issue requests, so these are acknowledged and dropped
    Response(Value),
}

impl IncomingMessage {
    /// Classify a single JSON value; malformed messages get the error to send back
    pub fn parse(value: Value) -> Result<Self, JsonRpcResponse> {
        let is_response = value.get("method").is_none()
            && (value.get("result").is_some() || value.get("error").is_some());
        if is_response {
            return Ok(IncomingMessage::Response(value));
        }

        let id = value.get("id").cloned().unwrap_or(Value::Null);
        match serde_json::from_value::<JsonRpcRequest>(value) {
            Ok(request) if request.jsonrpc != JSONRPC_VERSION => Err(JsonRpcResponse::error(
                id,
                ErrorCode::InvalidRequest,
                "Invalid Request: jsonrpc must be \"2.0\"",
            )),
            Ok(request) if request.is_notification() => Ok(IncomingMessage::Notification(request)),
            Ok(request) => Ok(IncomingMessage::Request(request)),
            Err(e) => Err(JsonRpcResponse::error(
                id,
                ErrorCode::InvalidRequest,
                format!("Invalid Request: {}", e),
            )),
        }
    }
}

/// Whether `body` (a single message or a batch) carries an `initialize` request
pub fn is_initialize_request(body: &Value) -> bool {
    let is_initialize = |message: &Value| {
        message.get("method").and_then(Value::as_str) == Some("initialize")
            && message.get("id").map_or(false, |id| !id.is_null())
    };

    match body {
        Value::Array(batch) => batch.iter().any(is_initialize),
        message => is_initialize(message),
    }
}

/// Pick the protocol version to answer `initialize` with
pub fn negotiate_protocol_version(requested: Option<&str>) -> &'static str {
    requested
        .and_then(|requested| {
            SUPPORTED_PROTOCOL_VERSIONS
                .iter()
                .find(|supported| **supported == requested)
                .copied()
        })
        .unwrap_or(LATEST_PROTOCOL_VERSION)
}

/// MCP tool call parameters
#[derive(Debug, Deserialize)]
pub struct ToolCallParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Option<Value>,
}

impl ToolCallParams {
    /// Arguments as sent, or an empty object when omitted
    pub fn arguments(self) -> Value {
        match self.arguments {
            Some(Value::Null) | None => Value::Object(Map::new()),
            Some(arguments) => arguments,
        }
    }
}

/// Entry of a `tools/list` result
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolInfo<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub input_schema: &'a Value,
    pub annotations: &'a ToolAnnotations,
}

impl<'a> From<&'a ToolDefinition> for ToolInfo<'a> {
    fn from(tool: &'a ToolDefinition) -> Self {
        Self {
            name: &tool.name,
            description: &tool.description,
            input_schema: &tool.input_schema,
            annotations: &tool.annotations,
        }
    }
}

/// MCP server capabilities
#[derive(Debug, Serialize)]
pub struct ServerCapabilities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolsCapability>,
}

/// Tools capability information
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolsCapability {
    pub list_changed: bool,
}

/// MCP initialization request
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    #[serde(default)]
    pub protocol_version: Option<String>,
    #[serde(default)]
    pub client_info: Option<ClientInfo>,
}

/// Information about the MCP client
#[derive(Debug, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
}

/// MCP initialization response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    pub server_info: ServerInfo,
}

/// Information about this server
#[derive(Debug, Serialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

impl InitializeResult {
    pub fn new(protocol_version: &str) -> Self {
        Self {
            protocol_version: protocol_version.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability { list_changed: false }),
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }
}
