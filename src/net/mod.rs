//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Startup
//!     → tls.rs (read CA, client identity, optional listener identity)
//!     → transport.rs (one pooled mutual-TLS client)
//!     → shared with the HTTP layer for every proxied call
//! ```
//!
//! # Design Decisions
//! - Trust material errors are returned, never swallowed
//! - One rustls crypto provider (ring) for client and server configs
//! - Plain `http://` targets go through the same pool without TLS

pub mod tls;
pub mod transport;

pub use tls::TlsError;
pub use transport::ClientTransport;
