//! Shared outbound transport.
//!
//! # Responsibilities
//! - Build the single pooled HTTP client used for every proxied call
//! - Present the gateway's client certificate to TLS backends
//! - Verify backend certificates against the configured CA only
//!
//! # Design Decisions
//! - Built once at startup and shared behind an `Arc`; never rebuilt per request
//! - Connection reuse is whatever the pooled client's keep-alive provides
//! - HTTP/1.1 only towards backends

use std::path::Path;

use axum::body::Body;
use axum::http::Request;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client, ResponseFuture},
    rt::{TokioExecutor, TokioTimer},
};

use crate::config::UpstreamTlsConfig;
use crate::net::tls::{self, TlsError};

/// Pooled client speaking plain HTTP or mutual TLS.
pub type HttpsClient = Client<HttpsConnector<HttpConnector>, Body>;

/// The process-wide outbound transport.
#[derive(Debug, Clone)]
pub struct ClientTransport {
    client: HttpsClient,
}

impl ClientTransport {
    /// Load the CA and client identity and build the pooled client.
    pub fn build(
        ca_cert_path: &Path,
        client_cert_path: &Path,
        client_key_path: &Path,
    ) -> Result<Self, TlsError> {
        let tls = tls::client_config(ca_cert_path, client_cert_path, client_key_path)?;

        let connector = HttpsConnectorBuilder::new()
            .with_tls_config(tls)
            .https_or_http()
            .enable_http1()
            .build();

        let client = Client::builder(TokioExecutor::new())
            .pool_timer(TokioTimer::new())
            .build(connector);

        tracing::info!(
            ca_cert = %ca_cert_path.display(),
            client_cert = %client_cert_path.display(),
            "Upstream mutual TLS transport ready"
        );

        Ok(Self { client })
    }

    pub fn from_config(config: &UpstreamTlsConfig) -> Result<Self, TlsError> {
        Self::build(
            Path::new(&config.ca_cert_path),
            Path::new(&config.client_cert_path),
            Path::new(&config.client_key_path),
        )
    }

    /// Send a fully rewritten request to its backend.
    pub fn send(&self, request: Request<Body>) -> ResponseFuture {
        self.client.request(request)
    }
}
