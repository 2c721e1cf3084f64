//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router sending every path and method to the gateway
//! - Wire up middleware (request ID, tracing)
//! - Serve plain HTTP on a bound listener, or HTTPS via axum-server
//! - Stop accepting and drain when the shutdown signal fires

use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    response::Response,
    routing::any,
    Router,
};
use axum_server::{tls_rustls::RustlsConfig, Handle};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::http::gateway::Gateway;
use crate::http::request::UuidRequestId;

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            router: Self::build_router(gateway),
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(gateway: Gateway) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(gateway)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve plain HTTP until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Serve HTTPS until `shutdown` fires, then drain for at most `grace`.
    pub async fn run_tls(
        self,
        addr: SocketAddr,
        tls: RustlsConfig,
        grace: Duration,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let handle = Handle::new();
        let trigger = handle.clone();
        tokio::spawn(async move {
            let _ = shutdown.recv().await;
            tracing::info!(grace_secs = grace.as_secs(), "Draining connections");
            trigger.graceful_shutdown(Some(grace));
        });

        tracing::info!(address = %addr, "HTTPS server starting");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(app)
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }
}

async fn proxy_handler(
    State(gateway): State<Gateway>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Response {
    gateway.handle(addr, request).await
}
