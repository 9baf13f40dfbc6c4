/// Process configuration
///
/// Configuration is built once at startup (from CLI flags and environment
/// variables in `main.rs`) and handed by value to the server. Nothing in the
/// crate reads the environment after that point.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use reqwest::Url;
use thiserror::Error;

/// Default backend request timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
/// Default number of extra attempts for requests that never reached the backend
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
/// Default pause between retries in milliseconds
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1_000;
/// Port the HTTP transports listen on unless told otherwise
pub const DEFAULT_HTTP_PORT: u16 = 3000;
/// Seconds a Streamable HTTP session may sit unused before it is expired
pub const DEFAULT_SESSION_IDLE_TIMEOUT_SECS: u64 = 1_800;

/// Errors raised while assembling configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{name} is not defined")]
    Missing { name: &'static str },

    #[error("Invalid Dokploy URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

/// Settings for the Dokploy API client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the Dokploy API, e.g. `https://dokploy.example.com/api`
    pub base_url: String,
    /// Value sent in the `x-api-key` header
    pub api_key: String,
    pub timeout: Duration,
    pub retry_attempts: u32,
    pub retry_delay: Duration,
}

impl ClientConfig {
    /// Build a client configuration with default timeout and retry settings
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, ConfigError> {
        let base_url = base_url.into();
        let api_key = api_key.into();

        if base_url.trim().is_empty() {
            return Err(ConfigError::Missing { name: "DOKPLOY_URL" });
        }
        if api_key.trim().is_empty() {
            return Err(ConfigError::Missing { name: "DOKPLOY_API_KEY" });
        }

        let parsed = Url::parse(&base_url).map_err(|e| ConfigError::InvalidUrl {
            url: base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                url: base_url,
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ConfigError> {
        if timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "DOKPLOY_TIMEOUT",
                reason: "timeout must be greater than zero".to_string(),
            });
        }
        self.timeout = timeout;
        Ok(self)
    }

    pub fn with_retry(mut self, attempts: u32, delay: Duration) -> Self {
        self.retry_attempts = attempts;
        self.retry_delay = delay;
        self
    }
}

/// Which transport the process serves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    /// Newline-delimited JSON-RPC over stdin/stdout
    Stdio,
    /// Streamable HTTP and legacy SSE endpoints on one listener
    Http,
}

impl std::str::FromStr for TransportMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stdio" | "" => Ok(TransportMode::Stdio),
            "http" | "sse" => Ok(TransportMode::Http),
            other => Err(ConfigError::InvalidValue {
                name: "MCP_TRANSPORT",
                reason: format!("unknown transport '{}', expected stdio, http or sse", other),
            }),
        }
    }
}

/// Listener settings for HTTP mode
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Zero disables idle expiry
    pub session_idle_timeout: Duration,
}

impl HttpConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: DEFAULT_HTTP_PORT,
            session_idle_timeout: Duration::from_secs(DEFAULT_SESSION_IDLE_TIMEOUT_SECS),
        }
    }
}
