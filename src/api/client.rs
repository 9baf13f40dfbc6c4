/// reqwest-backed implementation of `DokployApi`
///
/// Every request carries the JSON content headers and the `x-api-key`
/// credential. Responses are decoded into `serde_json::Value`; failures are
/// mapped onto `ApiError` at the point the call is made.

use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use super::{ApiError, DokployApi};
use crate::config::ClientConfig;

/// Header Dokploy reads the API key from
pub const API_KEY_HEADER: &str = "x-api-key";

/// Longest raw body echoed back in an error message
const MAX_ERROR_BODY: usize = 500;

/// HTTP client for the Dokploy API
pub struct DokployClient {
    http: reqwest::Client,
    base_url: String,
    api_key: RwLock<Option<String>>,
    timeout: Duration,
    retry_attempts: u32,
    retry_delay: Duration,
}

impl DokployClient {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::InvalidRequest(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url,
            api_key: RwLock::new(Some(config.api_key)),
            timeout: config.timeout,
            retry_attempts: config.retry_attempts,
            retry_delay: config.retry_delay,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn auth_token(&self) -> Option<String> {
        self.api_key
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn url_for(&self, path: &str) -> Result<String, ApiError> {
        let path = path.trim();
        if path.is_empty() {
            return Err(ApiError::InvalidRequest("empty API path".to_string()));
        }
        if path.starts_with('/') {
            Ok(format!("{}{}", self.base_url, path))
        } else {
            Ok(format!("{}/{}", self.base_url, path))
        }
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let url = self.url_for(path)?;
        let mut attempt = 0;

        loop {
            debug!(method = %method, url = %url, has_data = body.is_some(), "Making API request");
            let started = Instant::now();

            let mut request = self
                .http
                .request(method.clone(), &url)
                .header(CONTENT_TYPE, "application/json")
                .header(ACCEPT, "application/json");
            if !query.is_empty() {
                request = request.query(query);
            }
            if let Some(token) = self.auth_token() {
                request = request.header(API_KEY_HEADER, token);
            }
            if let Some(body) = body {
                request = request.json(body);
            }

            match request.send().await {
                Ok(response) => return self.read_response(&method, path, response, started).await,
                // Only retry when the request never reached Dokploy
                Err(e) if e.is_connect() && attempt < self.retry_attempts => {
                    attempt += 1;
                    warn!(
                        method = %method,
                        path,
                        attempt,
                        max_attempts = self.retry_attempts,
                        error = %e,
                        "Connection to Dokploy failed, retrying"
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(e) => return Err(self.transport_error(&method, path, e)),
            }
        }
    }

    async fn read_response(
        &self,
        method: &Method,
        path: &str,
        response: reqwest::Response,
        started: Instant,
    ) -> Result<Value, ApiError> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.transport_error(method, path, e))?;
        let duration_ms = started.elapsed().as_millis() as u64;

        if status.is_success() {
            info!(
                method = %method,
                path,
                status = status.as_u16(),
                duration_ms,
                "API request completed"
            );
            return Ok(parse_body(&text));
        }

        let message = error_message(&text, status);
        log_status_failure(method, path, status, &message);
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    fn transport_error(&self, method: &Method, path: &str, e: reqwest::Error) -> ApiError {
        if e.is_timeout() {
            error!(method = %method, path, timeout_ms = self.timeout.as_millis() as u64, "Request to Dokploy timed out");
            ApiError::Timeout(self.timeout)
        } else if e.is_decode() || e.is_body() {
            error!(method = %method, path, error = %e, "Failed to read Dokploy response");
            ApiError::Decode(e.to_string())
        } else if e.is_builder() {
            ApiError::InvalidRequest(e.to_string())
        } else {
            error!(method = %method, path, error = %e, "Network error - no response received from Dokploy");
            ApiError::Network(e.to_string())
        }
    }
}

#[async_trait]
impl DokployApi for DokployClient {
    async fn get(&self, path: &str, query: &[(String, String)]) -> Result<Value, ApiError> {
        self.execute(Method::GET, path, query, None).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        self.execute(Method::POST, path, &[], Some(body)).await
    }

    fn set_auth_token(&self, token: &str) {
        *self.api_key.write().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        info!("Auth token updated for API client");
    }

    fn clear_auth_token(&self) {
        *self.api_key.write().unwrap_or_else(PoisonError::into_inner) = None;
        info!("Auth token cleared from API client");
    }
}

/// Decode a successful body; Dokploy answers some mutations with nothing
fn parse_body(text: &str) -> Value {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(trimmed).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Pull a human-readable message out of an error body
fn error_message(text: &str, status: StatusCode) -> String {
    if let Ok(body) = serde_json::from_str::<Value>(text) {
        for key in ["message", "error"] {
            if let Some(message) = body.get(key).and_then(Value::as_str) {
                return message.to_string();
            }
        }
    }

    let trimmed = text.trim();
    if !trimmed.is_empty() {
        return trimmed.chars().take(MAX_ERROR_BODY).collect();
    }

    status
        .canonical_reason()
        .unwrap_or("Unknown server error")
        .to_string()
}

fn log_status_failure(method: &Method, path: &str, status: StatusCode, message: &str) {
    let code = status.as_u16();
    match code {
        401 => error!(method = %method, path, status = code, message, "Authentication failed - Invalid or expired API key"),
        403 => error!(method = %method, path, status = code, message, "Access forbidden - Insufficient permissions"),
        404 => error!(method = %method, path, status = code, message, "Resource not found"),
        422 => error!(method = %method, path, status = code, message, "Validation error"),
        500 => error!(method = %method, path, status = code, message, "Internal server error"),
        _ => error!(method = %method, path, status = code, message, "Server error ({})", code),
    }
}
