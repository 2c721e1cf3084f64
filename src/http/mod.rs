//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, request ID, trace layer)
//!     → gateway.rs (entry point: log, resolve, 404 short-circuit)
//!     → forwarder.rs (parse target, rewrite, send over shared transport)
//!     → response.rs (relay backend response or generic error)
//!     → Send to client
//! ```

pub mod forwarder;
pub mod gateway;
pub mod request;
pub mod response;
pub mod server;

pub use forwarder::{Forwarder, InvalidTarget, ResolvedTarget};
pub use gateway::Gateway;
pub use request::{UuidRequestId, X_FORWARDED_FOR, X_REQUEST_ID};
pub use server::HttpServer;
