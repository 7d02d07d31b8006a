//! Access logging in combined log format.
//!
//! # Responsibilities
//! - Append one combined-log-format line per request/response pair
//! - Share a single sink (stdout or file) across all handler invocations
//!
//! # Design Decisions
//! - Writes are serialized by a mutex; lines are flushed immediately
//! - A failed write never fails the response; worst case is a missing line
//! - Independent of business logic: runs as middleware around the router

use std::fs::OpenOptions;
use std::io::Write;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, Request},
    middleware::Next,
    response::Response,
};
use chrono::Local;

use crate::config::AccessLogConfig;

/// Shared append-only access log sink.
pub struct AccessLog {
    sink: Mutex<Box<dyn Write + Send>>,
}

impl AccessLog {
    /// Open the sink named by the config: a file in append mode, or stdout.
    pub fn from_config(config: &AccessLogConfig) -> std::io::Result<Self> {
        let sink: Box<dyn Write + Send> = match &config.path {
            Some(path) => Box::new(OpenOptions::new().create(true).append(true).open(path)?),
            None => Box::new(std::io::stdout()),
        };
        Ok(Self {
            sink: Mutex::new(sink),
        })
    }

    /// Append a single line. Errors are logged, never propagated.
    pub fn write_line(&self, line: &str) {
        let mut sink = self.sink.lock().expect("access log mutex poisoned");
        if let Err(e) = writeln!(sink, "{}", line).and_then(|_| sink.flush()) {
            tracing::warn!(error = %e, "Failed to write access log line");
        }
    }
}

/// Format one request/response pair as a combined-log-format line.
///
/// `client - - [time] "METHOD /path HTTP/x.y" status bytes "referer" "user-agent"`
pub fn combined_line(
    client: &str,
    method: &str,
    target: &str,
    version: &str,
    status: u16,
    bytes: Option<u64>,
    referer: Option<&str>,
    user_agent: Option<&str>,
) -> String {
    let timestamp = Local::now().format("%d/%b/%Y:%H:%M:%S %z");
    let bytes = bytes.map_or_else(|| "-".to_string(), |b| b.to_string());
    format!(
        "{} - - [{}] \"{} {} {}\" {} {} \"{}\" \"{}\"",
        client,
        timestamp,
        method,
        target,
        version,
        status,
        bytes,
        referer.unwrap_or("-"),
        user_agent.unwrap_or("-"),
    )
}

/// Middleware function that logs every request/response pair.
pub async fn access_log_middleware(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(log): State<Arc<AccessLog>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let client = addr.ip().to_string();
    let method = request.method().to_string();
    let target = request
        .uri()
        .path_and_query()
        .map(|pq| pq.to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    let version = format!("{:?}", request.version());
    let referer = header_value(&request, header::REFERER);
    let user_agent = header_value(&request, header::USER_AGENT);

    let response = next.run(request).await;

    let bytes = response
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok());

    log.write_line(&combined_line(
        &client,
        &method,
        &target,
        &version,
        response.status().as_u16(),
        bytes,
        referer.as_deref(),
        user_agent.as_deref(),
    ));

    response
}

fn header_value(request: &Request<Body>, name: header::HeaderName) -> Option<String> {
    request
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combined_line_shape() {
        let line = combined_line(
            "127.0.0.1",
            "POST",
            "/welcome",
            "HTTP/1.1",
            200,
            Some(25),
            None,
            Some("curl/8.0"),
        );
        assert!(line.starts_with("127.0.0.1 - - ["));
        assert!(line.contains("\"POST /welcome HTTP/1.1\" 200 25"));
        assert!(line.ends_with("\"-\" \"curl/8.0\""));
    }

    #[test]
    fn test_missing_length_is_dash() {
        let line = combined_line("::1", "GET", "/health", "HTTP/1.1", 200, None, None, None);
        assert!(line.contains("\" 200 - \""));
    }

    #[test]
    fn test_file_sink_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("access.log");
        let config = AccessLogConfig {
            enabled: true,
            path: Some(path.display().to_string()),
        };

        let log = AccessLog::from_config(&config).unwrap();
        log.write_line("line one");
        log.write_line("line two");

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "line one\nline two\n");
    }
}
