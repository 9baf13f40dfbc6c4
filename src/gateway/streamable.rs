/// Streamable HTTP transport (`/mcp`)
///
/// - POST submits JSON-RPC messages, creating a session on `initialize`
/// - GET opens the session's server push stream
/// - DELETE terminates the session
///
/// Sessions are correlated through the `mcp-session-id` header.

use std::convert::Infallible;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures::stream::{Stream, StreamExt};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::error::GatewayError;
use super::{keep_alive, to_sse_event, GatewayState};
use crate::mcp::protocol::is_initialize_request;
use crate::mcp::{new_session_id, ChannelError, PushChannel, Session, TransportKind};

pub const SESSION_HEADER: &str = "mcp-session-id";

fn session_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(SESSION_HEADER).and_then(|value| value.to_str().ok())
}

fn known_session(state: &GatewayState, headers: &HeaderMap) -> Option<Arc<Session>> {
    session_header(headers).and_then(|id| state.registry.lookup(TransportKind::Streamable, id))
}

/// POST /mcp
pub async fn handle_post(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, GatewayError> {
    // Parsed by hand so malformed bodies get a JSON-RPC parse error
    let payload: Value = serde_json::from_slice(&body).map_err(|e| {
        warn!("Failed to parse JSON-RPC payload: {}", e);
        GatewayError::Parse(e.to_string())
    })?;

    if let Some(session) = known_session(&state, &headers) {
        debug!(session_id = %session.id(), "Reusing session");
        session.touch();
        let reply = state.dispatcher.handle_value(payload).await;
        return reply_with_session(session.id(), reply);
    }

    if session_header(&headers).is_none() && is_initialize_request(&payload) {
        return initialize(state, payload).await;
    }

    warn!(session_id = ?session_header(&headers), "Rejected request without a valid session");
    Err(GatewayError::NoValidSession)
}

async fn initialize(state: GatewayState, payload: Value) -> Result<Response, GatewayError> {
    let session_id = new_session_id();
    let reply = state.dispatcher.handle_value(payload).await;

    if reply.as_ref().map_or(false, negotiated) {
        state
            .registry
            .create(TransportKind::Streamable, session_id.clone(), Arc::new(PushChannel::new()))?;
        info!(session_id = %session_id, "Session initialized");
        reply_with_session(&session_id, reply)
    } else {
        Ok(reply_without_session(reply))
    }
}

/// Whether the reply carries a successful `initialize` result
fn negotiated(reply: &Value) -> bool {
    let succeeded = |message: &Value| {
        message
            .get("result")
            .and_then(|result| result.get("protocolVersion"))
            .is_some()
    };
    match reply {
        Value::Array(replies) => replies.iter().any(succeeded),
        message => succeeded(message),
    }
}

fn reply_without_session(reply: Option<Value>) -> Response {
    match reply {
        Some(reply) => Json(reply).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

fn reply_with_session(session_id: &str, reply: Option<Value>) -> Result<Response, GatewayError> {
    let header = HeaderValue::from_str(session_id).map_err(|e| GatewayError::Internal(e.to_string()))?;
    let mut response = reply_without_session(reply);
    response.headers_mut().insert(SESSION_HEADER, header);
    Ok(response)
}

/// GET /mcp
pub async fn handle_get(
    State(state): State<GatewayState>,
    headers: HeaderMap,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, GatewayError> {
    let session = known_session(&state, &headers).ok_or(GatewayError::InvalidSession)?;
    session.touch();

    let events = session.channel().subscribe().map_err(|e| match e {
        ChannelError::Busy => GatewayError::StreamConflict,
        ChannelError::Closed | ChannelError::Full => GatewayError::InvalidSession,
    })?;
    info!(session_id = %session.id(), "Push stream opened");

    let stream = events.map(|event| Ok::<_, Infallible>(to_sse_event(event)));
    Ok(Sse::new(stream).keep_alive(keep_alive()))
}

/// DELETE /mcp
pub async fn handle_delete(
    State(state): State<GatewayState>,
    headers: HeaderMap,
) -> Result<StatusCode, GatewayError> {
    let session = known_session(&state, &headers).ok_or(GatewayError::InvalidSession)?;
    state.registry.remove(TransportKind::Streamable, session.id());
    Ok(StatusCode::OK)
}
