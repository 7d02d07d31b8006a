//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Initialize subsystems → Start listener
//!
//! Shutdown (shutdown.rs):
//!     SIGTERM/SIGINT → broadcast to tasks → stop accepting → drain → exit
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The listener starts last (traffic only when ready)
//! - In-flight requests drain before exit

pub mod shutdown;

pub use shutdown::{wait_for_signal, Shutdown};
