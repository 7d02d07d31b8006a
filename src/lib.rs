//! Greeting Service
//!
//! A small JSON-over-HTTP service built with Tokio and Axum. It accepts a
//! POST with a `name` field and returns a templated greeting, plus a health
//! endpoint and an optional echo endpoint pair.
//!
//! # Architecture Overview
//!
//! ```text
//!                   ┌────────────────────────────────────────────────┐
//!                   │                GREETING SERVICE                 │
//!                   │                                                 │
//!  Client Request   │  ┌──────────┐   ┌──────────┐   ┌────────────┐  │
//!  ─────────────────┼─▶│   rate   │──▶│ security │──▶│   access   │  │
//!                   │  │ limiter  │   │ headers  │   │   logger   │  │
//!                   │  └──────────┘   └──────────┘   └─────┬──────┘  │
//!                   │                                       ▼         │
//!                   │                                ┌────────────┐  │
//!  Client Response  │                                │  handlers  │  │
//!  ◀────────────────┼────────────────────────────────│ + fallback │  │
//!                   │                                └────────────┘  │
//!                   │                                                 │
//!                   │  ┌──────────────────────────────────────────┐  │
//!                   │  │           Cross-Cutting Concerns          │  │
//!                   │  │  ┌────────┐ ┌─────────────┐ ┌──────────┐ │  │
//!                   │  │  │ config │ │observability│ │lifecycle │ │  │
//!                   │  │  └────────┘ └─────────────┘ └──────────┘ │  │
//!                   │  └──────────────────────────────────────────┘  │
//!                   └────────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod config;
pub mod http;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
