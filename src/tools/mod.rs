/// MCP tools exposed by the Dokploy gateway
///
/// A `ToolDefinition` pairs a name and JSON input schema with an async
/// handler. `ToolDefinition::invoke` is the only way a handler is run: it
/// validates the raw arguments, calls the handler and folds every outcome
/// into a `ResponseEnvelope`.

pub mod response;
pub mod catalog;
pub mod project;
pub mod application;
pub mod database;

pub use response::*;
pub use catalog::*;

use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures::future::BoxFuture;
use futures::FutureExt;
use schemars::gen::SchemaSettings;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::api::ApiError;

/// Errors raised while declaring a tool
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Invalid input schema for tool {name}: {reason}")]
    InvalidSchema { name: String, reason: String },

    #[error("Duplicate tool name: {0}")]
    DuplicateName(String),
}

/// Advisory hints published with a tool; never enforced here
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolAnnotations {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_only_hint: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destructive_hint: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idempotent_hint: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_world_hint: Option<bool>,
}

impl ToolAnnotations {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Read-only and idempotent
    pub fn read_only(mut self) -> Self {
        self.read_only_hint = Some(true);
        self.idempotent_hint = Some(true);
        self
    }

    pub fn destructive(mut self, destructive: bool) -> Self {
        self.destructive_hint = Some(destructive);
        self
    }

    pub fn idempotent(mut self, idempotent: bool) -> Self {
        self.idempotent_hint = Some(idempotent);
        self
    }

    pub fn open_world(mut self, open_world: bool) -> Self {
        self.open_world_hint = Some(open_world);
        self
    }
}

/// What a handler produces when it runs to completion
#[derive(Debug, Clone, PartialEq)]
pub enum ToolReply {
    Success { message: String, data: Option<Value> },
    /// The call went through but the handler still reports a tool-level error
    Failure { message: String, details: Option<String> },
}

impl ToolReply {
    pub fn success(message: impl Into<String>, data: Value) -> Self {
        ToolReply::Success {
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn failure(message: impl Into<String>, details: impl Into<String>) -> Self {
        ToolReply::Failure {
            message: message.into(),
            details: Some(details.into()),
        }
    }
}

/// Ways a handler can fail
#[derive(Error, Debug)]
pub enum ToolFailure {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Arguments passed the schema but could not be decoded into the tool's input type
    #[error("{0}")]
    InvalidArguments(String),

    /// Untyped failure; only its description is known
    #[error("{0}")]
    Other(String),
}

/// Downstream failure classes, each with its own user-facing template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Authentication,
    NotFound,
    Server,
    Generic,
}

impl FailureKind {
    /// Classify a handler failure.
    ///
    /// Backend errors are classified by the status code the call observed.
    /// Untyped failures only carry a description, so they fall back to
    /// looking for status markers in the text.
    pub fn classify(failure: &ToolFailure) -> Self {
        match failure {
            ToolFailure::Api(ApiError::Status { status: 401, .. }) => FailureKind::Authentication,
            ToolFailure::Api(ApiError::Status { status: 404, .. }) => FailureKind::NotFound,
            ToolFailure::Api(ApiError::Status { status: 500, .. }) => FailureKind::Server,
            ToolFailure::Api(_) | ToolFailure::InvalidArguments(_) => FailureKind::Generic,
            ToolFailure::Other(description) => Self::from_description(description),
        }
    }

    pub fn from_description(description: &str) -> Self {
        if description.contains("401") || description.contains("Unauthorized") {
            FailureKind::Authentication
        } else if description.contains("404") || description.contains("Not Found") {
            FailureKind::NotFound
        } else if description.contains("500") || description.contains("Internal Server Error") {
            FailureKind::Server
        } else {
            FailureKind::Generic
        }
    }

    /// Render the error envelope for a failed call of `tool`
    pub fn envelope(self, tool: &str, failure: &ToolFailure) -> ResponseEnvelope {
        match self {
            FailureKind::Authentication => ResponseEnvelope::error(
                format!("Authentication failed for tool: {}", tool),
                Some("Please check your DOKPLOY_API_KEY configuration".to_string()),
            ),
            FailureKind::NotFound => ResponseEnvelope::error(
                "Resource not found",
                Some(format!("The requested resource for {} could not be found", tool)),
            ),
            FailureKind::Server => ResponseEnvelope::error(
                "Server error occurred",
                Some(format!(
                    "Dokploy server encountered an internal error while processing {}",
                    tool
                )),
            ),
            FailureKind::Generic => ResponseEnvelope::error(
                format!("Failed to execute tool: {}", tool),
                Some(format!("Error: {}", failure)),
            ),
        }
    }
}

pub type HandlerFuture = BoxFuture<'static, Result<ToolReply, ToolFailure>>;

/// Handler receiving already-validated arguments
pub type ToolHandler = Arc<dyn Fn(Value) -> HandlerFuture + Send + Sync>;

/// One declared operation
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
    pub annotations: ToolAnnotations,
    validator: jsonschema::Validator,
    handler: ToolHandler,
}

impl fmt::Debug for ToolDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDefinition")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("annotations", &self.annotations)
            .finish_non_exhaustive()
    }
}

impl ToolDefinition {
    /// Declare a tool from a raw JSON schema and an untyped handler
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Value,
        annotations: ToolAnnotations,
        handler: ToolHandler,
    ) -> Result<Self, ToolError> {
        let name = name.into();
        let validator = jsonschema::validator_for(&input_schema).map_err(|e| ToolError::InvalidSchema {
            name: name.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            name,
            description: description.into(),
            input_schema,
            annotations,
            validator,
            handler,
        })
    }

    /// Declare a tool whose schema is derived from its input type
    pub fn typed<I, F, Fut>(
        name: impl Into<String>,
        description: impl Into<String>,
        annotations: ToolAnnotations,
        handler: F,
    ) -> Result<Self, ToolError>
    where
        I: JsonSchema + DeserializeOwned + Send + 'static,
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ToolReply, ToolFailure>> + Send + 'static,
    {
        let handler: ToolHandler = Arc::new(move |arguments: Value| -> HandlerFuture {
            match serde_json::from_value::<I>(arguments) {
                Ok(input) => handler(input).boxed(),
                Err(e) => futures::future::ready(Err(ToolFailure::InvalidArguments(e.to_string()))).boxed(),
            }
        });
        Self::new(name, description, input_schema_for::<I>(), annotations, handler)
    }

    /// Check `arguments` against the input schema, listing every violation
    pub fn validate(&self, arguments: &Value) -> Result<(), String> {
        let violations = self
            .validator
            .iter_errors(arguments)
            .map(|e| format!("{}: {}", field_path(&e.instance_path.to_string()), e))
            .collect::<Vec<_>>();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations.join(", "))
        }
    }

    /// Run the tool. Never fails: every outcome becomes an envelope.
    pub async fn invoke(&self, arguments: Value) -> ResponseEnvelope {
        if let Err(violations) = self.validate(&arguments) {
            warn!(tool = %self.name, errors = %violations, "Input validation failed");
            return self.invalid_input(&violations);
        }

        info!(tool = %self.name, "Executing tool");
        debug!(tool = %self.name, input = %arguments, "Tool input");
        let started = Instant::now();

        // The handler is called inside the guarded future so a panic while
        // building it is caught as well
        let outcome = AssertUnwindSafe(async { (self.handler)(arguments).await })
            .catch_unwind()
            .await
            .unwrap_or_else(|_| Err(ToolFailure::Other("tool handler panicked".to_string())));
        let duration_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(ToolReply::Success { message, data }) => {
                info!(tool = %self.name, duration_ms, "Tool executed successfully");
                ResponseEnvelope::success(message, data)
            }
            Ok(ToolReply::Failure { message, details }) => {
                warn!(tool = %self.name, duration_ms, error = %message, "Tool reported failure");
                ResponseEnvelope::error(message, details)
            }
            Err(ToolFailure::InvalidArguments(details)) => {
                warn!(tool = %self.name, errors = %details, "Input decoding failed");
                self.invalid_input(&details)
            }
            Err(failure) => {
                let kind = FailureKind::classify(&failure);
                error!(
                    tool = %self.name,
                    duration_ms,
                    kind = ?kind,
                    error = %failure,
                    "Tool execution failed"
                );
                kind.envelope(&self.name, &failure)
            }
        }
    }

    fn invalid_input(&self, violations: &str) -> ResponseEnvelope {
        ResponseEnvelope::error(
            format!("Invalid input for tool: {}", self.name),
            Some(format!("Validation errors: {}", violations)),
        )
    }
}

/// JSON schema for a tool input type, inlined and without the draft header
pub fn input_schema_for<I: JsonSchema>() -> Value {
    let generator = SchemaSettings::draft07()
        .with(|s| s.inline_subschemas = true)
        .into_generator();
    let root = generator.into_root_schema_for::<I>();

    let mut schema = serde_json::to_value(root).unwrap_or_else(|_| serde_json::json!({"type": "object"}));
    if let Some(object) = schema.as_object_mut() {
        object.remove("$schema");
        object.remove("title");
        if object.get("definitions").and_then(Value::as_object).map_or(false, |d| d.is_empty()) {
            object.remove("definitions");
        }
    }
    schema
}

/// Turn a JSON pointer (`/selectedServices/0/type`) into `selectedServices.0.type`
fn field_path(pointer: &str) -> String {
    let path = pointer
        .trim_start_matches('/')
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
        .collect::<Vec<_>>()
        .join(".");

    if path.is_empty() {
        "input".to_string()
    } else {
        path
    }
}
