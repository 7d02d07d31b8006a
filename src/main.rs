use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use greeting_service::config::{self, ServiceConfig};
use greeting_service::http::HttpServer;
use greeting_service::lifecycle::{self, Shutdown};
use greeting_service::observability::metrics;

#[derive(Debug, Parser)]
#[command(name = "greeting-service", version, about = "JSON greeting service")]
struct Args {
    /// Path to the TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load configuration first so the log level can come from it
    let config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => config::default_config()?,
    };

    init_tracing(&config);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        rate_limit_enabled = config.rate_limit.enabled,
        security_headers = config.security.enable_headers,
        access_log_enabled = config.access_log.enabled,
        echo_enabled = config.routes.echo_enabled,
        "Configuration loaded"
    );

    // Bind TCP listener
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    // Initialize metrics exposition
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => {
                tracing::error!(
                    metrics_address = %config.observability.metrics_address,
                    "Failed to parse metrics address"
                );
            }
        }
    }

    // Wire OS signals to the shutdown coordinator
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        lifecycle::wait_for_signal().await;
        shutdown.trigger();
    });

    // Create and run HTTP server
    let server = HttpServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn init_tracing(config: &ServiceConfig) {
    let default_filter = format!(
        "greeting_service={},tower_http=info",
        config.observability.log_level
    );

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
