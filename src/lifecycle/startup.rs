//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the route table and the shared mutual-TLS transport
//! - Load the listener's TLS identity when configured
//! - Bind the listener and serve until shutdown
//!
//! # Design Decisions
//! - Fail fast: trust material errors are returned before any traffic is served
//! - Nothing here exits the process; `main` decides
//! - Listeners start last (traffic only when ready)

use std::net::{AddrParseError, SocketAddr};
use std::path::Path;
use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::config::GatewayConfig;
use crate::http::{Gateway, HttpServer};
use crate::net::tls::{load_tls_config, TlsError};
use crate::net::ClientTransport;
use crate::routing::RouteTable;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("upstream trust material: {0}")]
    UpstreamTls(#[source] TlsError),

    #[error("listener TLS: {0}")]
    ListenerTls(#[source] TlsError),

    #[error("invalid bind address '{address}': {source}")]
    BindAddress {
        address: String,
        #[source]
        source: AddrParseError,
    },

    #[error("could not bind {address}: {source}")]
    Bind {
        address: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Build the route table and transport; the gateway is ready to serve afterwards.
pub fn prepare_gateway(config: &GatewayConfig) -> Result<Gateway, StartupError> {
    let routes = RouteTable::from_config(config.routes.clone());
    if routes.is_empty() {
        tracing::warn!("No routes configured; every request will be answered with 404");
    }
    for route in routes.routes() {
        tracing::debug!(prefix = %route.prefix(), url = %route.target_base_url(), "Route loaded");
    }

    let transport =
        ClientTransport::from_config(&config.upstream_tls).map_err(StartupError::UpstreamTls)?;

    tracing::info!(routes = routes.len(), "Gateway ready");
    Ok(Gateway::new(routes, transport))
}

/// Prepare the gateway, bind the configured listener and serve until `shutdown` fires.
pub async fn run(
    config: GatewayConfig,
    shutdown: broadcast::Receiver<()>,
) -> Result<(), StartupError> {
    let gateway = prepare_gateway(&config)?;

    let address = &config.listener.bind_address;
    let addr: SocketAddr = address.parse().map_err(|source| StartupError::BindAddress {
        address: address.clone(),
        source,
    })?;

    let server = HttpServer::new(gateway);

    match &config.listener.tls {
        Some(tls) => {
            let tls_config = load_tls_config(Path::new(&tls.cert_path), Path::new(&tls.key_path))
                .map_err(StartupError::ListenerTls)?;
            let grace = Duration::from_secs(config.listener.shutdown_grace_secs);
            server
                .run_tls(addr, tls_config, grace, shutdown)
                .await
                .map_err(StartupError::Serve)
        }
        None => {
            let listener = TcpListener::bind(addr)
                .await
                .map_err(|source| StartupError::Bind {
                    address: addr,
                    source,
                })?;
            server.run(listener, shutdown).await.map_err(StartupError::Serve)
        }
    }
}
