//! Metrics collection and exposition.
//!
//! # Metrics
//! - `greeting_requests_total` (counter): total requests by method, status
//! - `greeting_request_duration_seconds` (histogram): latency distribution
//! - `greeting_rate_limited_total` (counter): requests rejected by the limiter
//!
//! # Design Decisions
//! - Low-overhead metric updates (atomic operations under the hood)
//! - Exposed on a separate listener so probes never mix with service traffic

use std::net::SocketAddr;
use std::time::Instant;

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and exposition endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(error = %e, "Failed to start metrics endpoint"),
    }
}

/// Record a completed request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    counter!(
        "greeting_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
    )
    .increment(1);
    histogram!("greeting_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record a request rejected by the rate limiter.
pub fn record_rate_limited() {
    counter!("greeting_rate_limited_total").increment(1);
}

/// Middleware function recording per-request metrics.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();

    let response = next.run(request).await;

    record_request(&method, response.status().as_u16(), start);
    response
}
