/// Graceful shutdown with push streams still attached
use crate::support::*;

#[cfg(test)]
mod shutdown_integration_tests {
    use super::*;
    use dokploy_mcp::{DokployServer, ServerError};
    use serde_json::json;
    use std::net::SocketAddr;
    use std::time::Duration;
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;
    use tokio::task::JoinHandle;

    /// Start a server on an ephemeral port; sending on the returned channel stops it
    async fn start_server() -> (SocketAddr, oneshot::Sender<()>, JoinHandle<Result<(), ServerError>>) {
        let server = DokployServer::with_api(RecordingApi::new(json!({}))).unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop, stopped) = oneshot::channel::<()>();

        let handle = tokio::spawn(server.serve(listener, Duration::ZERO, async move {
            let _ = stopped.await;
        }));
        (addr, stop, handle)
    }

    async fn assert_stops(stop: oneshot::Sender<()>, handle: JoinHandle<Result<(), ServerError>>) {
        stop.send(()).unwrap();
        let finished = tokio::time::timeout(Duration::from_secs(5), handle).await;
        assert!(matches!(finished, Ok(Ok(Ok(())))), "server did not stop: {:?}", finished);
    }

    #[tokio::test]
    async fn test_shutdown_with_legacy_stream_attached() {
        let (addr, stop, handle) = start_server().await;

        let mut stream = reqwest::get(format!("http://{}/sse", addr)).await.unwrap();
        assert_eq!(stream.status(), 200);
        let first = stream.chunk().await.unwrap().unwrap();
        assert!(String::from_utf8_lossy(&first).contains("event: endpoint"));

        assert_stops(stop, handle).await;
        assert!(!matches!(stream.chunk().await, Ok(Some(_))));
    }

    #[tokio::test]
    async fn test_shutdown_with_streamable_stream_attached() {
        let (addr, stop, handle) = start_server().await;
        let client = reqwest::Client::new();
        let url = format!("http://{}/mcp", addr);

        let initialized = client
            .post(&url)
            .header("accept", "application/json, text/event-stream")
            .json(&initialize_request(1))
            .send()
            .await
            .unwrap();
        assert_eq!(initialized.status(), 200);
        let session_id = initialized.headers()["mcp-session-id"].to_str().unwrap().to_string();
        let reply: serde_json::Value = initialized.json().await.unwrap();
        assert!(reply["result"]["protocolVersion"].is_string());

        let mut stream = client
            .get(&url)
            .header("accept", "text/event-stream")
            .header("mcp-session-id", &session_id)
            .send()
            .await
            .unwrap();
        assert_eq!(stream.status(), 200);

        assert_stops(stop, handle).await;
        assert!(!matches!(stream.chunk().await, Ok(Some(_))));
    }
}
