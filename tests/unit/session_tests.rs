/// Session registry and channel tests
use dokploy_mcp::mcp::*;

#[cfg(test)]
mod session_unit_tests {
    use super::*;
    use dokploy_mcp::api::{ApiError, DokployApi};
    use dokploy_mcp::gateway::sse::deliver;
    use dokploy_mcp::tools::ToolCatalog;
    use futures::stream::BoxStream;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Channel that reports closed and records every write attempt
    #[derive(Default)]
    struct ClosedChannel {
        pushes: AtomicUsize,
    }

    impl SessionChannel for ClosedChannel {
        fn push(&self, _event: PushEvent) -> Result<(), ChannelError> {
            self.pushes.fetch_add(1, Ordering::SeqCst);
            Err(ChannelError::Closed)
        }

        fn subscribe(self: Arc<Self>) -> Result<BoxStream<'static, PushEvent>, ChannelError> {
            Err(ChannelError::Closed)
        }

        fn close(&self) {}

        fn is_closed(&self) -> bool {
            true
        }
    }

    struct StaticApi;

    #[async_trait::async_trait]
    impl DokployApi for StaticApi {
        async fn get(&self, _path: &str, _query: &[(String, String)]) -> Result<Value, ApiError> {
            Ok(json!({"projectId": "p1", "name": "shop"}))
        }

        async fn post(&self, _path: &str, _body: &Value) -> Result<Value, ApiError> {
            Ok(json!({}))
        }

        fn set_auth_token(&self, _token: &str) {}

        fn clear_auth_token(&self) {}
    }

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(Arc::new(ToolCatalog::dokploy(Arc::new(StaticApi)).unwrap()))
    }

    #[test]
    fn test_duplicate_session_leaves_existing_entry() {
        let registry = SessionRegistry::new();
        let original: Arc<dyn SessionChannel> = Arc::new(PushChannel::new());
        let first = registry
            .create(TransportKind::Streamable, "session-1", original.clone())
            .unwrap();

        let duplicate = registry.create(TransportKind::Streamable, "session-1", Arc::new(PushChannel::new()));
        assert!(matches!(duplicate, Err(SessionError::Duplicate { .. })));

        let current = registry.lookup(TransportKind::Streamable, "session-1").unwrap();
        assert!(Arc::ptr_eq(&current, &first));
        assert!(current.is_active());
        assert!(!original.is_closed());
        assert_eq!(registry.len(TransportKind::Streamable), 1);
    }

    #[test]
    fn test_removed_identifier_is_unknown() {
        let registry = SessionRegistry::new();
        registry
            .create(TransportKind::Sse, "session-2", Arc::new(PushChannel::new()))
            .unwrap();

        registry.remove(TransportKind::Sse, "session-2");
        registry.remove(TransportKind::Sse, "session-2");
        assert!(registry.lookup(TransportKind::Sse, "session-2").is_none());
    }

    #[tokio::test]
    async fn test_reply_to_closed_channel_is_discarded() {
        let channel = Arc::new(ClosedChannel::default());
        let request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "tools/call",
            "params": {"name": "project-one", "arguments": {"projectId": "p1"}}
        });

        deliver(&dispatcher(), channel.clone(), request).await;
        assert_eq!(channel.pushes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_reply_pushed_to_open_channel() {
        let channel = Arc::new(PushChannel::new());
        let request = json!({"jsonrpc": "2.0", "id": 2, "method": "ping"});

        deliver(&dispatcher(), channel.clone(), request).await;

        use futures::StreamExt;
        let mut events = channel.subscribe().unwrap();
        assert_eq!(
            events.next().await,
            Some(PushEvent::Message(json!({"jsonrpc": "2.0", "id": 2, "result": {}})))
        );
    }
}
