/// Canonical tool result envelope
///
/// Every tool invocation, successful or not, ends up as one of these: a
/// single text content item holding a pretty-printed JSON document of either
/// `{success: true, message, data?}` or `{success: false, error, details?}`.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Result returned to the client for a `tools/call`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub content: Vec<ToolContent>,
    #[serde(default)]
    pub is_error: bool,
}

/// Content item returned by a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolContent {
    /// Type of content (always "text" here)
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: String,
}

impl ResponseEnvelope {
    /// Success envelope; `data` is attached only when it is an object or array
    pub fn success(message: impl Into<String>, data: Option<Value>) -> Self {
        let mut body = Map::new();
        body.insert("success".to_string(), Value::Bool(true));
        body.insert("message".to_string(), Value::String(message.into()));
        if let Some(data) = data.filter(is_structured) {
            body.insert("data".to_string(), data);
        }
        Self::text(Value::Object(body), false)
    }

    /// Error envelope with an optional details line
    pub fn error(message: impl Into<String>, details: Option<String>) -> Self {
        let mut body = Map::new();
        body.insert("success".to_string(), Value::Bool(false));
        body.insert("error".to_string(), Value::String(message.into()));
        if let Some(details) = details.filter(|d| !d.is_empty()) {
            body.insert("details".to_string(), Value::String(details));
        }
        Self::text(Value::Object(body), true)
    }

    fn text(body: Value, is_error: bool) -> Self {
        let text = serde_json::to_string_pretty(&body).unwrap_or_else(|_| body.to_string());
        Self {
            content: vec![ToolContent {
                content_type: "text".to_string(),
                text,
            }],
            is_error,
        }
    }

    /// Parse the JSON payload back out of the text item
    pub fn payload(&self) -> Option<Value> {
        self.content
            .first()
            .and_then(|c| serde_json::from_str(&c.text).ok())
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| {
            json!({
                "content": [{"type": "text", "text": "{\"success\":false,\"error\":\"Failed to encode tool result\"}"}],
                "isError": true
            })
        })
    }
}

fn is_structured(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}
