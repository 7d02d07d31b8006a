//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (structured, via the tracing crate)
//!     → access_log.rs (one combined-format line per request)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout, file)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Access log is independent of business logic and of tracing output
//! - Request ID flows through all subsystems via tower-http
//! - Metrics are cheap (atomic increments) and optional

pub mod access_log;
pub mod metrics;

pub use access_log::{access_log_middleware, AccessLog};
