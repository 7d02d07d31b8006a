//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → rate_limit.rs (check per-IP sliding window)
//!     → body size limit (tower-http, configured in http/server.rs)
//!     → Pass to routing
//!
//! Outgoing response:
//!     → headers.rs (add protective response headers)
//! ```
//!
//! # Design Decisions
//! - Fail closed: a client over its limit is rejected before any handler runs
//! - No trust in client input

pub mod headers;
pub mod rate_limit;

pub use headers::security_headers_middleware;
pub use rate_limit::{rate_limit_middleware, RateLimiterState};
