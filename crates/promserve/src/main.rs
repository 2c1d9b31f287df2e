//! Promserve - static page server with Prometheus request metrics

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;

use config::Config;
use promserve_api::{AppState, create_router};
use promserve_metrics::HttpMetrics;

/// Promserve - static page server with Prometheus request metrics
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Bind address
    #[arg(long, env = "PROMSERVE_BIND")]
    bind: Option<String>,

    /// Port
    #[arg(short, long, env = "PROMSERVE_PORT")]
    port: Option<u16>,

    /// File served at `/`
    #[arg(long, env = "PROMSERVE_STATIC_FILE")]
    static_file: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration
    let loaded = Config::load(&args.config)?;
    let from_file = loaded.is_some();
    let mut config = loaded.unwrap_or_default();
    if let Some(bind) = args.bind {
        config.server.bind_address = bind;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(static_file) = args.static_file {
        config.content.static_file = static_file;
    }
    config.validate()?;

    // Initialize logging
    init_logging(&config.logging.level, &config.logging.format);

    info!("Starting Promserve v{}", env!("CARGO_PKG_VERSION"));
    if from_file {
        info!("Loaded configuration from {}", args.config);
    } else {
        info!("Config file not found at {}, using defaults", args.config);
    }

    // Register metric series before accepting connections
    let metrics = HttpMetrics::new(&config.metrics.registry_config())
        .context("Failed to register metrics")?;

    // Create router
    let state = AppState::new(
        metrics,
        &config.content.static_file,
        config.metrics.path.clone(),
    );
    let app = create_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.server.bind_address, config.server.port)
        .parse()
        .with_context(|| format!("Invalid bind address: {}", config.server.bind_address))?;

    // Start server
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    // Printed unconditionally, independent of the log filter
    println!("Serving requests on port {}", config.server.port);
    info!("Listening on {}", addr);
    info!("Static file: {}", config.content.static_file);
    info!("Metrics endpoint: {}", config.metrics.path);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Initialize logging
fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if format == "json" {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
