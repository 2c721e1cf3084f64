//! Per-request entry point.
//!
//! ```text
//! START ──resolve──▶ ROUTE_NOT_FOUND ──▶ 404 "Not Found"
//!   │
//!   └──────────────▶ ROUTE_RESOLVED ──forward──▶ FORWARDED | FORWARD_FAILED
//!                                                 └─▶ log duration
//! ```
//!
//! Every path is terminal; nothing is retried.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{body::Body, http::Request, response::Response};

use crate::http::forwarder::Forwarder;
use crate::http::request::request_id;
use crate::http::response;
use crate::net::ClientTransport;
use crate::routing::RouteTable;

/// Route table plus shared transport, built once and cloned into every handler.
#[derive(Debug, Clone)]
pub struct Gateway {
    routes: Arc<RouteTable>,
    forwarder: Forwarder,
}

impl Gateway {
    pub fn new(routes: RouteTable, transport: ClientTransport) -> Self {
        Self {
            routes: Arc::new(routes),
            forwarder: Forwarder::new(Arc::new(transport)),
        }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn transport(&self) -> &Arc<ClientTransport> {
        self.forwarder.transport()
    }

    /// Resolve and forward one inbound request.
    pub async fn handle(&self, client: SocketAddr, request: Request<Body>) -> Response {
        let start = Instant::now();
        let client_ip = client.ip();

        tracing::info!(
            client = %client_ip,
            context = %request.uri(),
            request_id = %request_id(&request),
            "New request"
        );

        let path = request.uri().path().to_string();
        let Some(target_url) = self.routes.resolve(&path) else {
            tracing::error!(client = %client_ip, path = %path, "URL mapping not found");
            return response::not_found();
        };

        let response = self.forwarder.forward(&target_url, client, request).await;

        tracing::info!(duration = start.elapsed().as_secs_f64(), "Request served");
        response
    }
}
