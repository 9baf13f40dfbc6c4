/// Dokploy API access layer
///
/// Tools never talk HTTP directly; they go through the `DokployApi` trait so
/// the transport layer and tests can swap in another backend.

pub mod client;

pub use client::*;

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors returned by a backend call
///
/// Each failure keeps what the call actually observed (status code, timeout,
/// connection failure) so callers can classify it without reading messages.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("Request failed with status code {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response from Dokploy: {0}")]
    Decode(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// HTTP status reported by the backend, if it answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Trait defining the calls tools can make against Dokploy
#[async_trait]
pub trait DokployApi: Send + Sync {
    /// GET `path` with the given query parameters
    async fn get(&self, path: &str, query: &[(String, String)]) -> Result<Value, ApiError>;

    /// POST `body` as JSON to `path`
    async fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError>;

    /// Replace the credential sent with every request
    fn set_auth_token(&self, token: &str);

    /// Stop sending a credential
    fn clear_auth_token(&self);
}
