/// Protocol-level failures of the HTTP transports
///
/// Each one is rendered as a JSON-RPC error document with a `null` id, the
/// way MCP clients expect session errors to look.

use std::any::Any;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use jsonrpc_core::ErrorCode;
use serde_json::Value;
use thiserror::Error;
use tracing::error;

use crate::mcp::protocol::{JsonRpcResponse, SESSION_ERROR};
use crate::mcp::SessionError;

#[derive(Error, Debug)]
pub enum GatewayError {
    /// POST /mcp without a known session that is not an initialize request either
    #[error("Bad Request: No valid session ID provided for existing session or invalid initialization request")]
    NoValidSession,

    #[error("Invalid or missing session ID")]
    InvalidSession,

    #[error("Conflict: Only one SSE stream is allowed per session")]
    StreamConflict,

    #[error("sessionId query parameter is required")]
    MissingSessionId,

    #[error("No transport found for sessionId")]
    UnknownTransport,

    #[error("Parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("{0}")]
    Internal(String),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::StreamConflict => StatusCode::CONFLICT,
            GatewayError::Session(_) | GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn code(&self) -> ErrorCode {
        match self {
            GatewayError::Parse(_) => ErrorCode::ParseError,
            GatewayError::Session(_) | GatewayError::Internal(_) => ErrorCode::InternalError,
            _ => SESSION_ERROR,
        }
    }

    /// JSON-RPC error body; internal details never reach the client
    pub fn to_body(&self) -> Value {
        let message = match self.code() {
            ErrorCode::InternalError => "Internal server error".to_string(),
            _ => self.to_string(),
        };
        JsonRpcResponse::error(Value::Null, self.code(), message).to_value()
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        if self.status().is_server_error() {
            error!(error = %self, "Error handling MCP request");
        }
        (self.status(), Json(self.to_body())).into_response()
    }
}

/// Response for a handler that panicked before writing anything
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    GatewayError::Internal(format!("handler panicked: {}", detail)).into_response()
}
