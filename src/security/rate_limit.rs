//! Per-client rate limiting middleware.

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::RateLimitConfig;
use crate::http::response::ApiError;
use crate::observability::metrics;

/// Shared counters for the sliding-window rate limiter.
///
/// One window per client key (IP address). Each window holds the timestamps
/// of requests admitted within the last `window` duration; requests beyond
/// `max_requests` in that span are rejected.
pub struct RateLimiterState {
    windows: Mutex<HashMap<String, VecDeque<Instant>>>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiterState {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            max_requests: config.max_requests as usize,
            window: Duration::from_secs(config.window_secs),
        }
    }

    /// Record a request for `key` and report whether it is admitted.
    pub fn check(&self, key: &str) -> bool {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> bool {
        let mut windows = self.windows.lock().expect("rate limiter mutex poisoned");
        let hits = windows.entry(key.to_string()).or_default();

        // Slide the window: drop hits older than the window length
        while let Some(&oldest) = hits.front() {
            if now.duration_since(oldest) >= self.window {
                hits.pop_front();
            } else {
                break;
            }
        }

        if hits.len() < self.max_requests {
            hits.push_back(now);
            true
        } else {
            false
        }
    }

    /// Drop client entries whose every hit has aged out of the window.
    ///
    /// Called periodically from a background task so idle clients don't
    /// accumulate in the table forever.
    pub fn sweep(&self) {
        let now = Instant::now();
        let mut windows = self.windows.lock().expect("rate limiter mutex poisoned");
        windows.retain(|_, hits| {
            hits.back()
                .is_some_and(|&newest| now.duration_since(newest) < self.window)
        });
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.windows.lock().expect("rate limiter mutex poisoned").len()
    }
}

/// Middleware function for per-IP rate limiting.
pub async fn rate_limit_middleware(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(state): State<Arc<RateLimiterState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let key = addr.ip().to_string();

    if state.check(&key) {
        next.run(request).await
    } else {
        tracing::warn!(client = %key, "Rate limit exceeded");
        metrics::record_rate_limited();
        ApiError::RateLimited.into_response()
    }
}
