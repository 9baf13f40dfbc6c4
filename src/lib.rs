/// Public library interface for the Dokploy MCP server
///
/// This module exports the main server implementation and public types
/// that can be used by other applications or tests.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpListener;

pub mod api;
pub mod config;
pub mod gateway;
pub mod mcp;
pub mod tools;

pub use api::{ApiError, DokployApi, DokployClient};
pub use config::{ClientConfig, ConfigError, HttpConfig, TransportMode};
pub use gateway::GatewayState;
pub use mcp::{Dispatcher, McpServer};
pub use tools::{ResponseEnvelope, ToolCatalog, ToolError};

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Dokploy client error: {0}")]
    Api(#[from] ApiError),

    #[error("Tool catalog error: {0}")]
    Tool(#[from] ToolError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Dokploy MCP server
///
/// Owns the tool catalog wired to a Dokploy backend and serves it over
/// stdio or HTTP.
pub struct DokployServer {
    dispatcher: Dispatcher,
}

impl DokployServer {
    /// Create a server talking to the Dokploy instance described by `config`
    pub fn new(config: ClientConfig) -> Result<Self, ServerError> {
        tracing::info!(base_url = %config.base_url, "Initializing Dokploy MCP server");
        let client = DokployClient::new(config)?;
        Self::with_api(Arc::new(client))
    }

    /// Create a server on top of any backend implementation
    pub fn with_api(api: Arc<dyn DokployApi>) -> Result<Self, ServerError> {
        let catalog = ToolCatalog::dokploy(api)?;
        Ok(Self {
            dispatcher: Dispatcher::new(Arc::new(catalog)),
        })
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Serve JSON-RPC over stdin/stdout until stdin closes
    pub async fn run_stdio(self) -> Result<(), ServerError> {
        mcp::McpServer::new(self.dispatcher).run().await
    }

    /// Axum router for the HTTP transports
    pub fn router(&self) -> axum::Router {
        gateway::router(GatewayState::new(self.dispatcher.clone()))
    }

    /// Serve both HTTP transports until ctrl-c
    pub async fn run_http(self, config: HttpConfig) -> Result<(), ServerError> {
        let listener = TcpListener::bind(config.socket_addr()).await?;
        tracing::info!(address = %listener.local_addr()?, "Dokploy MCP server listening");
        tracing::info!("Streamable HTTP endpoint: /mcp, legacy SSE endpoint: /sse, health: /health");

        self.serve(listener, config.session_idle_timeout, shutdown_signal()).await
    }

    /// Serve both HTTP transports on `listener` until `shutdown` resolves.
    ///
    /// Open sessions are closed as soon as shutdown begins, which ends their
    /// push streams so the connections holding them can drain. A zero
    /// `session_idle_timeout` disables idle expiry.
    pub async fn serve<F>(
        self,
        listener: TcpListener,
        session_idle_timeout: Duration,
        shutdown: F,
    ) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let state = GatewayState::new(self.dispatcher);
        let registry = state.registry.clone();
        let sweeper = (!session_idle_timeout.is_zero())
            .then(|| gateway::spawn_session_sweeper(registry.clone(), session_idle_timeout));

        let served = axum::serve(listener, gateway::router(state))
            .with_graceful_shutdown(async move {
                shutdown.await;
                let closed = registry.close_all();
                tracing::info!(sessions = closed, "Closed open sessions");
            })
            .await;

        if let Some(sweeper) = sweeper {
            sweeper.abort();
        }
        served?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
