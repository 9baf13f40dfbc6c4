/// Main entry point for the Dokploy MCP server
///
/// This file sets up logging, parses command line arguments and environment
/// variables, and starts the server on stdio or on HTTP.

use std::net::IpAddr;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use dokploy_mcp::config::{
    DEFAULT_HTTP_PORT, DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_DELAY_MS, DEFAULT_SESSION_IDLE_TIMEOUT_SECS,
    DEFAULT_TIMEOUT_MS,
};
use dokploy_mcp::{ClientConfig, DokployServer, HttpConfig, ServerError, TransportMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

/// Command line arguments for the Dokploy MCP server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base URL of the Dokploy API, e.g. https://dokploy.example.com/api
    #[arg(long, env = "DOKPLOY_URL")]
    dokploy_url: String,

    /// Dokploy API key
    #[arg(long, env = "DOKPLOY_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Backend request timeout in milliseconds
    #[arg(long, env = "DOKPLOY_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_MS)]
    timeout_ms: u64,

    /// Extra attempts for requests that never reached Dokploy
    #[arg(long, env = "DOKPLOY_RETRY_ATTEMPTS", default_value_t = DEFAULT_RETRY_ATTEMPTS)]
    retry_attempts: u32,

    /// Pause between retries in milliseconds
    #[arg(long, env = "DOKPLOY_RETRY_DELAY", default_value_t = DEFAULT_RETRY_DELAY_MS)]
    retry_delay_ms: u64,

    /// Transport to serve: stdio, http or sse
    #[arg(long, env = "MCP_TRANSPORT", default_value = "stdio")]
    transport: String,

    /// Serve the HTTP transports (same as --transport http)
    #[arg(long)]
    http: bool,

    /// Serve the HTTP transports (same as --transport sse)
    #[arg(long)]
    sse: bool,

    /// Address to listen on in HTTP mode
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port to listen on in HTTP mode
    #[arg(long, env = "PORT", default_value_t = DEFAULT_HTTP_PORT)]
    port: u16,

    /// Seconds before an unused Streamable HTTP session expires (0 disables)
    #[arg(long, env = "MCP_SESSION_IDLE_TIMEOUT", default_value_t = DEFAULT_SESSION_IDLE_TIMEOUT_SECS)]
    session_idle_timeout_secs: u64,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn transport_mode(&self) -> Result<TransportMode, ServerError> {
        if self.http || self.sse {
            return Ok(TransportMode::Http);
        }
        Ok(self.transport.parse::<TransportMode>()?)
    }

    fn client_config(&self) -> Result<ClientConfig, ServerError> {
        let config = ClientConfig::new(&self.dokploy_url, &self.api_key)?
            .with_timeout(Duration::from_millis(self.timeout_ms))?
            .with_retry(self.retry_attempts, Duration::from_millis(self.retry_delay_ms));
        Ok(config)
    }
}

fn init_logging(args: &Args) {
    // Set up logging based on command line flags
    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("dokploy_mcp={},tower_http={}", log_level, log_level)));

    // Send logs to stderr, stdout belongs to the stdio transport
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match args.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

async fn run(args: Args) -> Result<(), ServerError> {
    let mode = args.transport_mode()?;
    let server = DokployServer::new(args.client_config()?)?;

    match mode {
        TransportMode::Stdio => {
            info!("Starting Dokploy MCP server on stdio");
            server.run_stdio().await
        }
        TransportMode::Http => {
            let http = HttpConfig {
                host: args.host,
                port: args.port,
                session_idle_timeout: Duration::from_secs(args.session_idle_timeout_secs),
            };
            info!(address = %http.socket_addr(), "Starting Dokploy MCP server on HTTP");
            server.run_http(http).await
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args);

    match run(args).await {
        Ok(()) => {
            info!("Dokploy MCP server shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Fatal error: {}", e);
            eprintln!("dokploy-mcp: {}", e);
            ExitCode::FAILURE
        }
    }
}
