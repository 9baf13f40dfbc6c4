/// Dokploy client tests against a local fake backend
use crate::support::*;

#[cfg(test)]
mod client_integration_tests {
    use super::*;
    use axum::extract::Query;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use dokploy_mcp::api::{ApiError, DokployApi, DokployClient};
    use dokploy_mcp::{ClientConfig, DokployServer};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::time::Duration;

    fn fake_dokploy() -> Router {
        Router::new()
            .route(
                "/api/project.one",
                get(|headers: HeaderMap, Query(query): Query<HashMap<String, String>>| async move {
                    if headers.get("x-api-key").and_then(|v| v.to_str().ok()) != Some("secret") {
                        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "Unauthorized"})));
                    }
                    match query.get("projectId").map(String::as_str) {
                        Some("p1") => (StatusCode::OK, Json(json!({"projectId": "p1", "name": "shop"}))),
                        _ => (StatusCode::NOT_FOUND, Json(json!({"message": "Project not found"}))),
                    }
                }),
            )
            .route(
                "/api/project.create",
                post(|Json(body): Json<Value>| async move { Json(json!({"projectId": "p2", "received": body})) }),
            )
            .route("/api/application.deploy", post(|| async { StatusCode::OK }))
            .route(
                "/api/application.readTraefikConfig",
                get(|| async { "http:\n  routers: {}\n" }),
            )
            .route(
                "/api/postgres.deploy",
                post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
            )
            .route(
                "/api/project.all",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(2)).await;
                    Json(json!([]))
                }),
            )
    }

    fn client(base_url: &str) -> DokployClient {
        DokployClient::new(ClientConfig::new(base_url, "secret").unwrap()).unwrap()
    }

    fn query(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[tokio::test]
    async fn test_get_sends_key_and_query() {
        let base = spawn_backend(fake_dokploy()).await;
        let client = client(&base);

        let project = client.get("/project.one", &query(&[("projectId", "p1")])).await.unwrap();
        assert_eq!(project, json!({"projectId": "p1", "name": "shop"}));

        let missing = client.get("/project.one", &query(&[("projectId", "nope")])).await;
        assert_eq!(
            missing,
            Err(ApiError::Status {
                status: 404,
                message: "Project not found".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_cleared_token_is_not_sent() {
        let base = spawn_backend(fake_dokploy()).await;
        let client = client(&base);

        client.clear_auth_token();
        let result = client.get("/project.one", &query(&[("projectId", "p1")])).await;
        assert_eq!(result.unwrap_err().status(), Some(401));

        client.set_auth_token("secret");
        assert!(client.get("/project.one", &query(&[("projectId", "p1")])).await.is_ok());
    }

    #[tokio::test]
    async fn test_post_body_and_empty_replies() {
        let base = spawn_backend(fake_dokploy()).await;
        let client = client(&base);

        let created = client.post("/project.create", &json!({"name": "shop"})).await.unwrap();
        assert_eq!(created["received"], json!({"name": "shop"}));

        let deployed = client.post("/application.deploy", &json!({"applicationId": "a1"})).await.unwrap();
        assert_eq!(deployed, Value::Null);

        let config = client.get("/application.readTraefikConfig", &[]).await.unwrap();
        assert_eq!(config, Value::String("http:\n  routers: {}\n".to_string()));
    }

    #[tokio::test]
    async fn test_server_error_keeps_raw_body() {
        let base = spawn_backend(fake_dokploy()).await;
        let result = client(&base).post("/postgres.deploy", &json!({"postgresId": "pg1"})).await;
        assert_eq!(
            result,
            Err(ApiError::Status {
                status: 500,
                message: "boom".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_timeout_is_not_retried() {
        let base = spawn_backend(fake_dokploy()).await;
        let config = ClientConfig::new(&base, "secret")
            .unwrap()
            .with_timeout(Duration::from_millis(200))
            .unwrap()
            .with_retry(3, Duration::from_millis(10));
        let client = DokployClient::new(config).unwrap();

        let started = std::time::Instant::now();
        let result = client.get("/project.all", &[]).await;
        assert_eq!(result, Err(ApiError::Timeout(Duration::from_millis(200))));
        assert!(started.elapsed() < Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = ClientConfig::new(format!("http://{}/api", addr), "secret")
            .unwrap()
            .with_retry(2, Duration::from_millis(10));
        let result = DokployClient::new(config).unwrap().get("/project.all", &[]).await;
        assert!(matches!(result, Err(ApiError::Network(_))));
    }

    #[tokio::test]
    async fn test_tool_calls_end_to_end() {
        let base = spawn_backend(fake_dokploy()).await;
        let server = DokployServer::new(ClientConfig::new(&base, "secret").unwrap()).unwrap();
        let dispatcher = server.dispatcher();

        let call = |id: u64, name: &str, arguments: Value| {
            json!({
                "jsonrpc": "2.0",
                "id": id,
                "method": "tools/call",
                "params": {"name": name, "arguments": arguments}
            })
        };
        let envelope = |reply: Value| -> (bool, Value) {
            let result = &reply["result"];
            let text = result["content"][0]["text"].as_str().unwrap();
            (result["isError"].as_bool().unwrap(), serde_json::from_str(text).unwrap())
        };

        let reply = dispatcher
            .handle_value(call(1, "project-one", json!({"projectId": "p1"})))
            .await
            .unwrap();
        let (is_error, body) = envelope(reply);
        assert!(!is_error);
        assert_eq!(body["message"], "Successfully fetched project \"p1\"");
        assert_eq!(body["data"]["name"], "shop");

        let reply = dispatcher
            .handle_value(call(2, "project-one", json!({"projectId": "nope"})))
            .await
            .unwrap();
        let (is_error, body) = envelope(reply);
        assert!(is_error);
        assert_eq!(body["error"], "Resource not found");
        assert_eq!(body["details"], "The requested resource for project-one could not be found");

        let reply = dispatcher
            .handle_value(call(3, "postgres-deploy", json!({"postgresId": "pg1"})))
            .await
            .unwrap();
        let (is_error, body) = envelope(reply);
        assert!(is_error);
        assert_eq!(body["error"], "Server error occurred");

        let reply = dispatcher
            .handle_value(call(4, "application-deploy", json!({"applicationId": "a1"})))
            .await
            .unwrap();
        let (is_error, body) = envelope(reply);
        assert!(!is_error);
        assert!(body.get("data").is_none());
    }

    #[tokio::test]
    async fn test_server_builds_from_api() {
        let api = RecordingApi::new(json!({}));
        let server = DokployServer::with_api(api).unwrap();
        assert_eq!(server.dispatcher().catalog().len(), 56);
    }
}
