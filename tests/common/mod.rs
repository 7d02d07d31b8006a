//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::time::Duration;

use greeting_service::{HttpServer, ServiceConfig, Shutdown};
use tokio::net::TcpListener;

/// Start the service on an ephemeral loopback port.
///
/// Returns the bound address and the shutdown handle; the server task runs
/// until the handle is triggered or the test process exits.
pub async fn start_service(mut config: ServiceConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    config.listener.bind_address = addr.to_string();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config).unwrap();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    // Give the accept loop a moment to come up
    tokio::time::sleep(Duration::from_millis(50)).await;

    (addr, shutdown)
}

/// A config with the noisier middleware off, for focused endpoint tests.
#[allow(dead_code)]
pub fn quiet_config() -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.access_log.enabled = false;
    config
}
