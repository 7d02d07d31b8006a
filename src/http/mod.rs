//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → handlers.rs (welcome / health / echo / fallback)
//!     → response.rs (success & error envelopes)
//!     → Send to client
//! ```

pub mod handlers;
pub mod response;
pub mod server;

pub use response::ApiError;
pub use server::HttpServer;
