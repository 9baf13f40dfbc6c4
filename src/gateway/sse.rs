/// Legacy HTTP+SSE transport (`/sse` + `/messages`)
///
/// Connecting to `/sse` creates a session and announces where to POST
/// messages. Replies travel back as `message` events on that stream.

use std::convert::Infallible;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, Sse};
use futures::stream::{self, BoxStream, Stream, StreamExt};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::error::GatewayError;
use super::{keep_alive, to_sse_event, GatewayState};
use crate::mcp::{
    new_session_id, Dispatcher, PushChannel, PushEvent, SessionChannel, SessionRegistry, TransportKind,
};

/// Path clients POST their messages to
pub const MESSAGES_PATH: &str = "/messages";

#[derive(Debug, Deserialize)]
pub struct MessagesQuery {
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

/// GET /sse
pub async fn handle_connect(
    State(state): State<GatewayState>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, GatewayError> {
    let session_id = new_session_id();
    let channel = Arc::new(PushChannel::new());
    state
        .registry
        .create(TransportKind::Sse, session_id.clone(), channel.clone())?;

    let events = match channel.subscribe() {
        Ok(events) => events,
        Err(e) => {
            state.registry.remove(TransportKind::Sse, &session_id);
            return Err(GatewayError::Internal(e.to_string()));
        }
    };

    let endpoint = PushEvent::Endpoint(format!("{}?sessionId={}", MESSAGES_PATH, session_id));
    let stream = SessionStream {
        inner: stream::once(async move { endpoint }).chain(events).boxed(),
        registry: state.registry.clone(),
        session_id,
    };

    Ok(Sse::new(stream.map(|event| Ok::<_, Infallible>(to_sse_event(event)))).keep_alive(keep_alive()))
}

/// POST /messages?sessionId=...
pub async fn handle_message(
    State(state): State<GatewayState>,
    Query(query): Query<MessagesQuery>,
    body: Bytes,
) -> Result<StatusCode, GatewayError> {
    let session_id = query.session_id.ok_or(GatewayError::MissingSessionId)?;
    let session = state
        .registry
        .lookup(TransportKind::Sse, &session_id)
        .ok_or_else(|| {
            warn!(session_id = %session_id, "No transport found for sessionId");
            GatewayError::UnknownTransport
        })?;
    session.touch();

    let payload: Value = serde_json::from_slice(&body).map_err(|e| {
        warn!(session_id = %session_id, "Failed to parse JSON-RPC payload: {}", e);
        GatewayError::Parse(e.to_string())
    })?;

    let dispatcher = state.dispatcher.clone();
    let channel = session.channel();
    tokio::spawn(async move {
        deliver(&dispatcher, channel, payload).await;
    });

    Ok(StatusCode::ACCEPTED)
}

/// Dispatch `payload` and push the reply onto `channel`.
///
/// The client may disconnect while the call is in flight; the reply is then
/// dropped after logging.
pub async fn deliver(dispatcher: &Dispatcher, channel: Arc<dyn SessionChannel>, payload: Value) {
    let Some(reply) = dispatcher.handle_value(payload).await else {
        return;
    };

    if channel.is_closed() {
        debug!("Session closed before reply was ready, dropping it");
        return;
    }
    if let Err(e) = channel.push(PushEvent::Message(reply)) {
        warn!(error = %e, "Failed to push reply to SSE client");
    }
}

/// Event stream of one legacy session; removes the session when dropped
struct SessionStream {
    inner: BoxStream<'static, PushEvent>,
    registry: Arc<SessionRegistry>,
    session_id: String,
}

impl Stream for SessionStream {
    type Item = PushEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}

impl Drop for SessionStream {
    fn drop(&mut self) {
        debug!(session_id = %self.session_id, "SSE stream closed");
        self.registry.remove(TransportKind::Sse, &self.session_id);
    }
}
