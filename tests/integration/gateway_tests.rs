/// HTTP gateway tests driven through the axum router
use crate::support::*;

#[cfg(test)]
mod gateway_integration_tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use dokploy_mcp::mcp::TransportKind;
    use futures::StreamExt;
    use serde_json::{json, Value};

    fn session_id(response: &axum::response::Response) -> String {
        response
            .headers()
            .get("mcp-session-id")
            .expect("session header")
            .to_str()
            .unwrap()
            .to_string()
    }

    fn get_mcp(session_id: &str) -> Request<Body> {
        Request::get("/mcp")
            .header("accept", "text/event-stream")
            .header("mcp-session-id", session_id)
            .body(Body::empty())
            .unwrap()
    }

    fn delete_mcp(session_id: &str) -> Request<Body> {
        Request::delete("/mcp")
            .header("mcp-session-id", session_id)
            .body(Body::empty())
            .unwrap()
    }

    /// Read SSE frames until one complete event has arrived
    async fn next_event<S>(stream: &mut S, buffer: &mut String) -> (String, String)
    where
        S: futures::Stream<Item = Result<axum::body::Bytes, axum::Error>> + Unpin,
    {
        loop {
            if let Some(end) = buffer.find("\n\n") {
                let frame = buffer[..end].to_string();
                buffer.drain(..end + 2);

                let mut event = String::new();
                let mut data = String::new();
                for line in frame.lines() {
                    if let Some(name) = line.strip_prefix("event: ") {
                        event = name.to_string();
                    } else if let Some(chunk) = line.strip_prefix("data: ") {
                        data.push_str(chunk);
                    }
                }
                if !event.is_empty() {
                    return (event, data);
                }
                continue;
            }

            let chunk = stream.next().await.expect("stream ended").unwrap();
            buffer.push_str(std::str::from_utf8(&chunk).unwrap());
        }
    }

    #[tokio::test]
    async fn test_initialize_creates_session() {
        let (app, state) = gateway(RecordingApi::new(json!({})));

        let response = send(&app, post_json("/mcp", None, initialize_request(1))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let id = session_id(&response);
        assert!(!id.is_empty());

        let body = body_json(response).await;
        assert_eq!(body["id"], 1);
        assert_eq!(body["result"]["protocolVersion"], "2025-03-26");
        assert_eq!(body["result"]["serverInfo"]["name"], "dokploy");

        assert_eq!(state.registry.len(TransportKind::Streamable), 1);
        assert!(state.registry.lookup(TransportKind::Streamable, &id).unwrap().is_active());
    }

    #[tokio::test]
    async fn test_known_session_is_reused() {
        let (app, state) = gateway(RecordingApi::new(json!({})));
        let id = session_id(&send(&app, post_json("/mcp", None, initialize_request(1))).await);

        let notification = json!({"jsonrpc": "2.0", "method": "notifications/initialized"});
        let response = send(&app, post_json("/mcp", Some(&id), notification)).await;
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let list = json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"});
        let response = send(&app, post_json("/mcp", Some(&id), list)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(session_id(&response), id);

        let body = body_json(response).await;
        let tools = body["result"]["tools"].as_array().unwrap();
        assert!(tools.iter().any(|t| t["name"] == "application-deploy"));
        assert!(tools.iter().any(|t| t["name"] == "postgres-saveExternalPort"));

        assert_eq!(state.registry.len(TransportKind::Streamable), 1);
    }

    #[tokio::test]
    async fn test_tool_call_over_session() {
        let api = RecordingApi::new(json!({"applicationId": "a1", "name": "web"}));
        let (app, _state) = gateway(api.clone());
        let id = session_id(&send(&app, post_json("/mcp", None, initialize_request(1))).await);

        let call = json!({
            "jsonrpc": "2.0",
            "id": 3,
            "method": "tools/call",
            "params": {"name": "application-one", "arguments": {"applicationId": "a1"}}
        });
        let body = body_json(send(&app, post_json("/mcp", Some(&id), call)).await).await;

        assert_eq!(body["result"]["isError"], false);
        let text = body["result"]["content"][0]["text"].as_str().unwrap();
        let payload: Value = serde_json::from_str(text).unwrap();
        assert_eq!(payload["success"], true);
        assert_eq!(payload["data"]["name"], "web");

        let calls = api.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, "GET");
        assert_eq!(calls[0].path, "/application.one");
        assert_eq!(calls[0].payload, json!({"applicationId": "a1"}));
    }

    #[tokio::test]
    async fn test_invalid_tool_input_skips_backend() {
        let api = RecordingApi::new(json!({}));
        let (app, _state) = gateway(api.clone());
        let id = session_id(&send(&app, post_json("/mcp", None, initialize_request(1))).await);

        let call = json!({
            "jsonrpc": "2.0",
            "id": 4,
            "method": "tools/call",
            "params": {"name": "project-create", "arguments": {"name": ""}}
        });
        let body = body_json(send(&app, post_json("/mcp", Some(&id), call)).await).await;

        assert_eq!(body["result"]["isError"], true);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_request_without_session_rejected() {
        let (app, state) = gateway(RecordingApi::new(json!({})));

        let list = json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"});
        let response = send(&app, post_json("/mcp", None, list)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["id"], Value::Null);
        assert_eq!(body["error"]["code"], -32000);
        assert_eq!(
            body["error"]["message"],
            "Bad Request: No valid session ID provided for existing session or invalid initialization request"
        );
        assert!(state.registry.is_empty(TransportKind::Streamable));
    }

    #[tokio::test]
    async fn test_initialize_with_unknown_session_rejected() {
        let (app, state) = gateway(RecordingApi::new(json!({})));

        let response = send(&app, post_json("/mcp", Some("stale-id"), initialize_request(1))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(state.registry.is_empty(TransportKind::Streamable));
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let (app, _state) = gateway(RecordingApi::new(json!({})));

        let request = Request::post("/mcp")
            .header("content-type", "application/json")
            .body(Body::from("{\"jsonrpc\": "))
            .unwrap();
        let response = send(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], -32700);
    }

    #[tokio::test]
    async fn test_terminated_session_is_unknown() {
        let (app, state) = gateway(RecordingApi::new(json!({})));
        let id = session_id(&send(&app, post_json("/mcp", None, initialize_request(1))).await);
        let session = state.registry.lookup(TransportKind::Streamable, &id).unwrap();

        let response = send(&app, delete_mcp(&id)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(state.registry.is_empty(TransportKind::Streamable));
        assert!(session.channel().is_closed());

        let ping = json!({"jsonrpc": "2.0", "id": 2, "method": "ping"});
        let response = send(&app, post_json("/mcp", Some(&id), ping)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], -32000);

        let response = send(&app, delete_mcp(&id)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["message"], "Invalid or missing session ID");
    }

    #[tokio::test]
    async fn test_push_stream_requires_session() {
        let (app, _state) = gateway(RecordingApi::new(json!({})));

        let request = Request::get("/mcp").body(Body::empty()).unwrap();
        let response = send(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["message"], "Invalid or missing session ID");

        let response = send(&app, get_mcp("unknown")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_single_push_stream_per_session() {
        let (app, state) = gateway(RecordingApi::new(json!({})));
        let id = session_id(&send(&app, post_json("/mcp", None, initialize_request(1))).await);

        let first = send(&app, get_mcp(&id)).await;
        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(first.headers()["content-type"], "text/event-stream");

        let second = send(&app, get_mcp(&id)).await;
        assert_eq!(second.status(), StatusCode::CONFLICT);
        assert_eq!(
            body_json(second).await["error"]["message"],
            "Conflict: Only one SSE stream is allowed per session"
        );

        // Dropping the stream detaches it; the session stays usable
        drop(first);
        assert_eq!(state.registry.len(TransportKind::Streamable), 1);
        let again = send(&app, get_mcp(&id)).await;
        assert_eq!(again.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_legacy_unknown_session_rejected() {
        let api = RecordingApi::new(json!({}));
        let (app, _state) = gateway(api.clone());

        let call = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "tools/call",
            "params": {"name": "project-all", "arguments": {}}
        });
        let response = send(&app, post_json("/messages?sessionId=never-issued", None, call.clone())).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], -32000);
        assert_eq!(body["error"]["message"], "No transport found for sessionId");

        let response = send(&app, post_json("/messages", None, call)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"]["message"],
            "sessionId query parameter is required"
        );

        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_legacy_session_lifecycle() {
        let api = RecordingApi::new(json!({"projectId": "p1", "name": "shop"}));
        let (app, state) = gateway(api.clone());

        let response = send(&app, Request::get("/sse").body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "text/event-stream");
        assert_eq!(state.registry.len(TransportKind::Sse), 1);

        let mut stream = response.into_body().into_data_stream();
        let mut buffer = String::new();

        let (event, endpoint) = next_event(&mut stream, &mut buffer).await;
        assert_eq!(event, "endpoint");
        let session_id = endpoint.strip_prefix("/messages?sessionId=").unwrap().to_string();
        assert!(state.registry.lookup(TransportKind::Sse, &session_id).is_some());

        let call = json!({
            "jsonrpc": "2.0",
            "id": 7,
            "method": "tools/call",
            "params": {"name": "project-one", "arguments": {"projectId": "p1"}}
        });
        let response = send(&app, post_json(&endpoint, None, call)).await;
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let (event, data) = next_event(&mut stream, &mut buffer).await;
        assert_eq!(event, "message");
        let reply: Value = serde_json::from_str(&data).unwrap();
        assert_eq!(reply["id"], 7);
        assert_eq!(reply["result"]["isError"], false);
        assert_eq!(api.calls()[0].path, "/project.one");

        drop(stream);
        assert!(state.registry.is_empty(TransportKind::Sse));

        let ping = json!({"jsonrpc": "2.0", "id": 8, "method": "ping"});
        let response = send(&app, post_json(&endpoint, None, ping)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _state) = gateway(RecordingApi::new(json!({})));

        let response = send(&app, Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert!(chrono::DateTime::parse_from_rfc3339(body["timestamp"].as_str().unwrap()).is_ok());
    }
}
