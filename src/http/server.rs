//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with all handlers
//! - Wire up middleware (rate limit, security headers, access log, tracing,
//!   request ID, timeout, body limit, panic recovery)
//! - Serve connections with graceful shutdown
//!
//! # Middleware order (request path)
//! ```text
//! client → security headers → rate limiter → access logger → metrics
//!        → request ID → trace → error envelope → timeout → body limit
//!        → panic guard → route handler (JSON parsing at the extractor)
//! ```
//!
//! Security headers sit outermost so every response carries them, including
//! rate-limit rejections and layer-generated errors.

use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    catch_panic::CatchPanicLayer,
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServiceConfig;
use crate::http::handlers;
use crate::http::response::{self, ApiError};
use crate::observability::{access_log_middleware, metrics, AccessLog};
use crate::security::{rate_limit_middleware, security_headers_middleware, RateLimiterState};

/// How often stale rate-limiter entries are swept.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// HTTP server for the greeting service.
pub struct HttpServer {
    router: Router,
    rate_limiter: Option<Arc<RateLimiterState>>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// Fails if the access log sink cannot be opened.
    pub fn new(config: ServiceConfig) -> std::io::Result<Self> {
        let access_log = if config.access_log.enabled {
            Some(Arc::new(AccessLog::from_config(&config.access_log)?))
        } else {
            None
        };

        let rate_limiter = config
            .rate_limit
            .enabled
            .then(|| Arc::new(RateLimiterState::new(&config.rate_limit)));

        let router = Self::build_router(&config, access_log, rate_limiter.clone());

        Ok(Self {
            router,
            rate_limiter,
        })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Later `.layer()` calls wrap earlier ones, so layers are added from the
    /// handler outward to match the documented middleware order.
    fn build_router(
        config: &ServiceConfig,
        access_log: Option<Arc<AccessLog>>,
        rate_limiter: Option<Arc<RateLimiterState>>,
    ) -> Router {
        let mut router = Router::new()
            .route("/welcome", post(handlers::welcome))
            .route("/health", get(handlers::health));

        if config.routes.echo_enabled {
            router = router.route(
                "/api/test",
                get(handlers::echo_get).post(handlers::echo_post),
            );
        }

        // `.layer()` wraps from the handler outward, so these are listed
        // innermost-first to match the documented request-path order.
        let mut router = router
            .fallback(handlers::not_found)
            .layer(CatchPanicLayer::custom(handle_panic))
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(middleware::from_fn(response::error_envelope_middleware))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

        if config.observability.metrics_enabled {
            router = router.layer(middleware::from_fn(metrics::metrics_middleware));
        }

        if let Some(log) = access_log {
            router = router.layer(middleware::from_fn_with_state(log, access_log_middleware));
        }

        if let Some(limiter) = rate_limiter {
            router = router.layer(middleware::from_fn_with_state(
                limiter,
                rate_limit_middleware,
            ));
        }

        if config.security.enable_headers {
            router = router.layer(middleware::from_fn(security_headers_middleware));
        }

        router
    }

    /// Run the server, accepting connections on the given listener until the
    /// shutdown signal fires. In-flight requests drain before returning.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        // Sweep stale rate-limiter entries in the background; the sweeper
        // listens on the same shutdown channel as the server, so it stops
        // even when serve exits with an error.
        if let Some(limiter) = self.rate_limiter.clone() {
            let mut sweeper_shutdown = shutdown.resubscribe();
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(SWEEP_INTERVAL);
                loop {
                    tokio::select! {
                        _ = interval.tick() => limiter.sweep(),
                        _ = sweeper_shutdown.recv() => break,
                    }
                }
            });
        }

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Convert a handler panic into the generic 500 response.
///
/// The panic detail is logged for operators; the client sees only the
/// generic error body.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");

    tracing::error!(panic = %detail, "Handler panicked");
    ApiError::Internal.into_response()
}
