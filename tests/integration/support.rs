/// Shared fixtures for the integration tests
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use dokploy_mcp::api::{ApiError, DokployApi};
use dokploy_mcp::gateway::{router, GatewayState};
use dokploy_mcp::mcp::Dispatcher;
use dokploy_mcp::tools::ToolCatalog;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower::ServiceExt;

/// One call observed by `RecordingApi`
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: &'static str,
    pub path: String,
    pub payload: Value,
}

/// Backend double that records calls and answers with a fixed document
pub struct RecordingApi {
    pub calls: Mutex<Vec<RecordedCall>>,
    reply: Value,
}

impl RecordingApi {
    pub fn new(reply: Value) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            reply,
        })
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DokployApi for RecordingApi {
    async fn get(&self, path: &str, query: &[(String, String)]) -> Result<Value, ApiError> {
        let payload = query
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect::<serde_json::Map<_, _>>();
        self.calls.lock().unwrap().push(RecordedCall {
            method: "GET",
            path: path.to_string(),
            payload: Value::Object(payload),
        });
        Ok(self.reply.clone())
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        self.calls.lock().unwrap().push(RecordedCall {
            method: "POST",
            path: path.to_string(),
            payload: body.clone(),
        });
        Ok(self.reply.clone())
    }

    fn set_auth_token(&self, _token: &str) {}

    fn clear_auth_token(&self) {}
}

/// Gateway router plus the state it shares, wired to `api`
pub fn gateway(api: Arc<RecordingApi>) -> (Router, GatewayState) {
    let catalog = ToolCatalog::dokploy(api).unwrap();
    let state = GatewayState::new(Dispatcher::new(Arc::new(catalog)));
    (router(state.clone()), state)
}

pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn post_json(uri: &str, session_id: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::post(uri)
        .header("content-type", "application/json")
        .header("accept", "application/json, text/event-stream");
    if let Some(id) = session_id {
        builder = builder.header("mcp-session-id", id);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn initialize_request(id: u64) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "initialize",
        "params": {
            "protocolVersion": "2025-03-26",
            "capabilities": {},
            "clientInfo": {"name": "integration-test", "version": "1.0.0"}
        }
    })
}

/// Serve `router` on an ephemeral local port; returns its `/api` base URL
pub async fn spawn_backend(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}/api", addr)
}
