//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → router.rs (scan the route table)
//!     → matcher.rs (prefix test, remainder join)
//!     → Return: target URL or NoMatch
//!
//! Route table construction (at startup):
//!     RouteConfig[]
//!     → Route[] in declaration order
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes built at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always matches same route
//! - Longest prefix wins, first declared wins on ties

pub mod matcher;
pub mod router;

pub use router::{Resolution, Route, RouteTable};
