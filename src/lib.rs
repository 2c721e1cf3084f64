//! Mutual-TLS reverse-proxy gateway.
//!
//! Requests are matched against configured path prefixes (longest wins)
//! and forwarded to the route's backend over one shared client that
//! presents a client certificate and trusts a private CA.
//!
//! ```text
//!     Client ──▶ http::server ──▶ http::gateway ──▶ routing::RouteTable
//!                                      │
//!                                      ▼
//!                               http::forwarder ──▶ net::ClientTransport ──mTLS──▶ Backend
//! ```

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod routing;

pub use config::schema::GatewayConfig;
pub use http::{Gateway, HttpServer};
pub use lifecycle::Shutdown;
pub use net::ClientTransport;
pub use routing::RouteTable;
