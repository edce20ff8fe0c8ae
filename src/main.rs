//! CORS Forwarding Proxy
//!
//! A minimal forwarding proxy built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌───────────────────────────────────────────┐
//!                      │               CORS PROXY                   │
//!                      │                                            │
//!     Client Request   │  ┌─────────┐     ┌──────────────────────┐ │
//!     ─────────────────┼─▶│  http   │────▶│       forward        │ │
//!                      │  │ server  │     │ target URL + deadline │ │
//!                      │  └─────────┘     └──────────┬───────────┘ │
//!                      │                             │              │
//!     Client Response  │  ┌─────────┐     ┌──────────▼───────────┐ │
//!     ◀────────────────┼──│ 200+CORS│◀────│   outbound client    │◀┼── Target
//!                      │  │ or 500  │     │   (bounded fetch)    │ │    Host
//!                      │  └─────────┘     └──────────────────────┘ │
//!                      │                                            │
//!                      │  ┌──────────────────────────────────────┐ │
//!                      │  │   config  │ observability │ lifecycle │ │
//!                      │  └──────────────────────────────────────┘ │
//!                      └───────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use cors_proxy::config::{self, ProxyConfig};
use cors_proxy::http::HttpServer;
use cors_proxy::lifecycle::Shutdown;
use cors_proxy::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "cors-proxy")]
#[command(about = "Forwarding proxy that relays GET requests with a permissive CORS header")]
struct Cli {
    /// Listen port (default 8080, or the port from the config file).
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Outbound fetch timeout in whole seconds (default 3).
    #[arg(short = 't', long)]
    timeout: Option<u64>,

    /// Optional TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init("cors_proxy=info,tower_http=info");

    tracing::info!("cors-proxy v0.1.0 starting");

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => ProxyConfig::default(),
    };

    // CLI flags take precedence over the config file.
    if let Some(port) = cli.port {
        let mut addr: SocketAddr = config.listener.bind_address.parse()?;
        addr.set_port(port);
        config.listener.bind_address = addr.to_string();
    }
    if let Some(timeout) = cli.timeout {
        config.upstream.fetch_timeout_secs = timeout;
    }
    config::validate_config(&config).map_err(config::ConfigError::Validation)?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        default_scheme = %config.upstream.default_scheme,
        fetch_timeout_secs = config.upstream.fetch_timeout_secs,
        "Configuration loaded"
    );

    // Bind TCP listener. Failure here is fatal.
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
