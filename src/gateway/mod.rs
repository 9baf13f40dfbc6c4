/// HTTP gateway serving both MCP transports from one process
///
/// Routes:
/// - `POST|GET|DELETE /mcp` - Streamable HTTP transport
/// - `GET /sse`, `POST /messages` - legacy HTTP+SSE transport
/// - `GET /health` - liveness probe

pub mod error;
pub mod sse;
pub mod streamable;

pub use error::GatewayError;

use std::sync::Arc;
use std::time::Duration;

use axum::response::sse::{Event, KeepAlive};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};
use tower_http::catch_panic::CatchPanicLayer;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::mcp::{Dispatcher, PushEvent, SessionRegistry, TransportKind};

/// Interval between SSE keep-alive comments
pub const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(15);
/// How often idle Streamable HTTP sessions are looked for
pub const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Shared by every HTTP handler
#[derive(Debug, Clone)]
pub struct GatewayState {
    pub dispatcher: Dispatcher,
    pub registry: Arc<SessionRegistry>,
}

impl GatewayState {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            registry: Arc::new(SessionRegistry::new()),
        }
    }
}

pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route(
            "/mcp",
            post(streamable::handle_post)
                .get(streamable::handle_get)
                .delete(streamable::handle_delete),
        )
        .route("/sse", get(sse::handle_connect))
        .route(sse::MESSAGES_PATH, post(sse::handle_message))
        .route("/health", get(health))
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Periodically expire Streamable HTTP sessions idle for longer than `max_idle`.
///
/// Legacy sessions are not swept; they end with their event stream.
pub fn spawn_session_sweeper(registry: Arc<SessionRegistry>, max_idle: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let period = if max_idle.is_zero() {
            SESSION_SWEEP_INTERVAL
        } else {
            SESSION_SWEEP_INTERVAL.min(max_idle)
        };
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            let expired = registry.expire_idle(TransportKind::Streamable, max_idle);
            if expired > 0 {
                info!(expired, remaining = registry.len(TransportKind::Streamable), "Expired idle sessions");
            }
        }
    })
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}

fn keep_alive() -> KeepAlive {
    KeepAlive::new().interval(KEEP_ALIVE_INTERVAL).text("keep-alive")
}

fn to_sse_event(event: PushEvent) -> Event {
    match event {
        PushEvent::Endpoint(path) => Event::default().event("endpoint").data(path),
        PushEvent::Message(message) => Event::default().event("message").data(message.to_string()),
    }
}
