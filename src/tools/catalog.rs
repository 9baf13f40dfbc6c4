/// Tool catalog composition
///
/// The catalog is assembled once at startup and is read-only afterwards.
/// Most Dokploy tools are thin passthroughs, so this module also holds the
/// builders for "POST the input to an endpoint" and "GET with the input as
/// query parameters" tools.

use std::collections::HashMap;
use std::sync::Arc;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::{application, database, project};
use super::{ResponseEnvelope, ToolAnnotations, ToolDefinition, ToolError, ToolFailure, ToolReply};
use crate::api::DokployApi;

/// Name, description and hints shared by every tool builder
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub annotations: ToolAnnotations,
}

impl ToolSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>, annotations: ToolAnnotations) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            annotations,
        }
    }
}

/// Hints for a tool that reads from Dokploy
pub fn read_hints(title: &str) -> ToolAnnotations {
    ToolAnnotations::titled(title).read_only().open_world(true)
}

/// Hints for a tool that changes state in Dokploy
pub fn write_hints(title: &str, destructive: bool, idempotent: bool) -> ToolAnnotations {
    ToolAnnotations::titled(title)
        .destructive(destructive)
        .idempotent(idempotent)
        .open_world(true)
}

/// Static collection of declared tools, keyed by unique name
#[derive(Debug, Default)]
pub struct ToolCatalog {
    tools: Vec<Arc<ToolDefinition>>,
    index: HashMap<String, usize>,
}

impl ToolCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The full Dokploy catalog, wired to `api`
    pub fn dokploy(api: Arc<dyn DokployApi>) -> Result<Self, ToolError> {
        let mut catalog = Self::new();
        catalog.extend(project::tools(&api)?)?;
        catalog.extend(application::tools(&api)?)?;
        catalog.extend(database::tools(&api)?)?;
        tracing::info!(tools = catalog.len(), "Tool catalog composed");
        Ok(catalog)
    }

    pub fn register(&mut self, tool: ToolDefinition) -> Result<(), ToolError> {
        if self.index.contains_key(&tool.name) {
            return Err(ToolError::DuplicateName(tool.name));
        }
        self.index.insert(tool.name.clone(), self.tools.len());
        self.tools.push(Arc::new(tool));
        Ok(())
    }

    pub fn extend(&mut self, tools: impl IntoIterator<Item = ToolDefinition>) -> Result<(), ToolError> {
        for tool in tools {
            self.register(tool)?;
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<ToolDefinition>> {
        self.index.get(name).map(|&i| self.tools[i].clone())
    }

    /// Tools in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ToolDefinition>> {
        self.tools.iter()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Invoke a tool by name; unknown names get an error envelope
    pub async fn call(&self, name: &str, arguments: Value) -> ResponseEnvelope {
        match self.get(name) {
            Some(tool) => tool.invoke(arguments).await,
            None => {
                tracing::warn!(tool = name, "Unknown tool requested");
                ResponseEnvelope::error(format!("Unknown tool: {}", name), None)
            }
        }
    }
}

/// Tool that POSTs its validated input to `endpoint`
pub fn post_tool<I, M>(
    api: &Arc<dyn DokployApi>,
    spec: ToolSpec,
    endpoint: impl Into<String>,
    message: M,
) -> Result<ToolDefinition, ToolError>
where
    I: JsonSchema + DeserializeOwned + Serialize + Send + 'static,
    M: Fn(&I) -> String + Send + Sync + 'static,
{
    let api = api.clone();
    let endpoint: Arc<str> = Arc::from(Into::<String>::into(endpoint));
    let message = Arc::new(message);

    ToolDefinition::typed(spec.name, spec.description, spec.annotations, move |input: I| {
        let api = api.clone();
        let endpoint = endpoint.clone();
        let message = message.clone();
        async move {
            let body = serde_json::to_value(&input)
                .map_err(|e| ToolFailure::InvalidArguments(e.to_string()))?;
            let data = api.post(&endpoint, &body).await?;
            Ok(ToolReply::success(message(&input), data))
        }
    })
}

/// Tool that GETs `endpoint` with its input as query parameters.
///
/// An empty backend answer is reported through `missing` as a tool-level
/// failure rather than an empty success.
pub fn fetch_tool<I, M, E>(
    api: &Arc<dyn DokployApi>,
    spec: ToolSpec,
    endpoint: impl Into<String>,
    message: M,
    missing: E,
) -> Result<ToolDefinition, ToolError>
where
    I: JsonSchema + DeserializeOwned + Serialize + Send + 'static,
    M: Fn(&I) -> String + Send + Sync + 'static,
    E: Fn(&I) -> (String, String) + Send + Sync + 'static,
{
    let api = api.clone();
    let endpoint: Arc<str> = Arc::from(Into::<String>::into(endpoint));
    let message = Arc::new(message);
    let missing = Arc::new(missing);

    ToolDefinition::typed(spec.name, spec.description, spec.annotations, move |input: I| {
        let api = api.clone();
        let endpoint = endpoint.clone();
        let message = message.clone();
        let missing = missing.clone();
        async move {
            let params = serde_json::to_value(&input)
                .map_err(|e| ToolFailure::InvalidArguments(e.to_string()))?;
            let data = api.get(&endpoint, &query_pairs(&params)).await?;

            if is_empty_body(&data) {
                let (message, details) = missing(&input);
                return Ok(ToolReply::failure(message, details));
            }
            Ok(ToolReply::success(message(&input), data))
        }
    })
}

/// Flatten a JSON object into query parameters, skipping nulls
pub fn query_pairs(params: &Value) -> Vec<(String, String)> {
    let Some(object) = params.as_object() else {
        return Vec::new();
    };

    object
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.clone(), value)
        })
        .collect()
}

pub(crate) fn is_empty_body(data: &Value) -> bool {
    match data {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Bool(b) => !b,
        _ => false,
    }
}
