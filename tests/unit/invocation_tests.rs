/// Tool invocation framework tests
use dokploy_mcp::tools::*;
use dokploy_mcp::ApiError;

#[cfg(test)]
mod invocation_unit_tests {
    use super::*;
    use schemars::JsonSchema;
    use serde::Deserialize;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug, Deserialize, JsonSchema)]
    #[serde(rename_all = "camelCase")]
    struct EchoInput {
        #[schemars(length(min = 1))]
        project_id: String,
        #[serde(default)]
        limit: Option<u32>,
    }

    /// Tool whose handler counts its calls and replies with `reply`
    fn counting_tool<F>(calls: Arc<AtomicUsize>, reply: F) -> ToolDefinition
    where
        F: Fn(&EchoInput) -> Result<ToolReply, ToolFailure> + Send + Sync + 'static,
    {
        let reply = Arc::new(reply);
        ToolDefinition::typed(
            "echo-tool",
            "Echoes its input",
            ToolAnnotations::titled("Echo").read_only(),
            move |input: EchoInput| {
                calls.fetch_add(1, Ordering::SeqCst);
                let outcome = reply(&input);
                async move { outcome }
            },
        )
        .unwrap()
    }

    fn payload(envelope: &ResponseEnvelope) -> Value {
        assert_eq!(envelope.content.len(), 1);
        assert_eq!(envelope.content[0].content_type, "text");
        envelope.payload().unwrap()
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let tool = counting_tool(calls.clone(), |_| Ok(ToolReply::success("ok", json!({}))));

        for arguments in [
            json!({}),
            json!({"projectId": ""}),
            json!({"projectId": 5}),
            json!({"projectId": "p1", "limit": "ten"}),
        ] {
            let envelope = tool.invoke(arguments).await;
            assert!(envelope.is_error);
            let body = payload(&envelope);
            assert_eq!(body["success"], false);
            assert_eq!(body["error"], "Invalid input for tool: echo-tool");
            assert!(body["details"].as_str().unwrap().starts_with("Validation errors: "));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_validation_lists_every_violation() {
        let calls = Arc::new(AtomicUsize::new(0));
        let tool = counting_tool(calls.clone(), |_| Ok(ToolReply::success("ok", json!({}))));

        let envelope = tool.invoke(json!({"projectId": "", "limit": -1})).await;
        let details = payload(&envelope)["details"].as_str().unwrap().to_string();
        assert!(details.contains("projectId"));
        assert!(details.contains("limit"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_success_attaches_structured_data() {
        let calls = Arc::new(AtomicUsize::new(0));
        let tool = counting_tool(calls.clone(), |input| {
            Ok(ToolReply::success(
                format!("Fetched {}", input.project_id),
                json!({"projectId": input.project_id, "nested": {"apps": [1, 2]}}),
            ))
        });

        let envelope = tool.invoke(json!({"projectId": "p1"})).await;
        assert!(!envelope.is_error);
        let body = payload(&envelope);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Fetched p1");
        assert_eq!(body["data"], json!({"projectId": "p1", "nested": {"apps": [1, 2]}}));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_success_without_payload_omits_data() {
        let calls = Arc::new(AtomicUsize::new(0));
        let tool = counting_tool(calls.clone(), |_| Ok(ToolReply::success("Deployed", Value::Null)));

        let body = payload(&tool.invoke(json!({"projectId": "p1"})).await);
        assert_eq!(body["success"], true);
        assert!(body.get("data").is_none());
    }

    #[tokio::test]
    async fn test_untyped_failures_classified_by_description() {
        let cases = [
            ("Request failed with status code 401", "Authentication failed for tool: echo-tool"),
            ("Unauthorized", "Authentication failed for tool: echo-tool"),
            ("got a 404 back", "Resource not found"),
            ("Not Found", "Resource not found"),
            ("upstream said 500", "Server error occurred"),
            ("Internal Server Error", "Server error occurred"),
            ("connection reset", "Failed to execute tool: echo-tool"),
        ];

        for (description, expected) in cases {
            let calls = Arc::new(AtomicUsize::new(0));
            let description = description.to_string();
            let tool = counting_tool(calls, move |_| Err(ToolFailure::Other(description.clone())));

            let envelope = tool.invoke(json!({"projectId": "p1"})).await;
            assert!(envelope.is_error);
            assert_eq!(payload(&envelope)["error"], expected);
        }
    }

    #[tokio::test]
    async fn test_backend_failures_classified_by_status() {
        let calls = Arc::new(AtomicUsize::new(0));
        let tool = counting_tool(calls, |_| {
            Err(ToolFailure::Api(ApiError::Status {
                status: 401,
                message: "bad key".to_string(),
            }))
        });

        let body = payload(&tool.invoke(json!({"projectId": "p1"})).await);
        assert_eq!(body["error"], "Authentication failed for tool: echo-tool");
        assert_eq!(body["details"], "Please check your DOKPLOY_API_KEY configuration");
    }

    #[tokio::test]
    async fn test_generic_failure_carries_cause() {
        let calls = Arc::new(AtomicUsize::new(0));
        let tool = counting_tool(calls, |_| {
            Err(ToolFailure::Api(ApiError::Status {
                status: 422,
                message: "name already taken".to_string(),
            }))
        });

        let body = payload(&tool.invoke(json!({"projectId": "p1"})).await);
        assert_eq!(body["error"], "Failed to execute tool: echo-tool");
        assert!(body["details"].as_str().unwrap().contains("name already taken"));
    }

    #[tokio::test]
    async fn test_handler_panic_becomes_error_envelope() {
        let calls = Arc::new(AtomicUsize::new(0));
        let tool = counting_tool(calls, |_| panic!("handler bug"));

        let envelope = tool.invoke(json!({"projectId": "p1"})).await;
        assert!(envelope.is_error);
        assert_eq!(payload(&envelope)["error"], "Failed to execute tool: echo-tool");
    }

    #[test]
    fn test_catalog_rejects_duplicate_names() {
        let mut catalog = ToolCatalog::new();
        let first = counting_tool(Arc::new(AtomicUsize::new(0)), |_| Ok(ToolReply::success("ok", json!({}))));
        let second = counting_tool(Arc::new(AtomicUsize::new(0)), |_| Ok(ToolReply::success("ok", json!({}))));

        catalog.register(first).unwrap();
        assert!(matches!(catalog.register(second), Err(ToolError::DuplicateName(name)) if name == "echo-tool"));
        assert_eq!(catalog.len(), 1);
    }
}
