//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::{IntoResponse, Json, Response},
    Router,
};
use hyper::{body::Incoming, server::conn::http1, service::service_fn};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::{TokioExecutor, TokioIo},
};
use mtls_gateway::config::{GatewayConfig, RouteConfig, UpstreamTlsConfig};
use mtls_gateway::lifecycle::prepare_gateway;
use mtls_gateway::net::tls::{
    crypto_provider, load_certs, load_private_key, load_root_store, load_tls_config,
};
use mtls_gateway::{HttpServer, Shutdown};
use rustls::server::WebPkiClientVerifier;
use rustls::ServerConfig;
use serde_json::{json, Map, Value};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_rustls::TlsAcceptor;

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

pub fn upstream_tls() -> UpstreamTlsConfig {
    UpstreamTlsConfig {
        ca_cert_path: fixture("ca.crt").display().to_string(),
        client_cert_path: fixture("client.crt").display().to_string(),
        client_key_path: fixture("client.key").display().to_string(),
    }
}

pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// HTTPS client that trusts only the test CA.
pub fn https_client() -> reqwest::Client {
    let ca = std::fs::read(fixture("ca.crt")).unwrap();
    reqwest::Client::builder()
        .no_proxy()
        .use_rustls_tls()
        .tls_built_in_root_certs(false)
        .add_root_certificate(reqwest::Certificate::from_pem(&ca).unwrap())
        .build()
        .unwrap()
}

/// GET `uri` exactly as written; reqwest would normalise dot segments first.
pub async fn raw_get(uri: &str) -> (StatusCode, String) {
    let client: Client<HttpConnector, Body> = Client::builder(TokioExecutor::new()).build_http();
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = client.request(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(Body::new(response.into_body()), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

/// A gateway serving on an ephemeral port; shuts down on drop.
pub struct TestGateway {
    pub addr: SocketAddr,
    scheme: &'static str,
    shutdown: Shutdown,
    server: Option<JoinHandle<()>>,
}

impl TestGateway {
    pub fn url(&self, path: &str) -> String {
        format!("{}://{}{}", self.scheme, self.addr, path)
    }

    /// Fire the shutdown signal without waiting.
    pub fn begin_shutdown(&self) {
        self.shutdown.trigger();
    }

    /// Wait for the server task to return after shutdown.
    pub async fn stopped(&mut self) {
        if let Some(server) = self.server.take() {
            tokio::time::timeout(Duration::from_secs(5), server)
                .await
                .expect("server did not stop")
                .unwrap();
        }
    }
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

fn gateway_config(routes: Vec<RouteConfig>) -> GatewayConfig {
    GatewayConfig {
        upstream_tls: upstream_tls(),
        routes,
        ..GatewayConfig::default()
    }
}

pub async fn spawn_gateway(routes: Vec<RouteConfig>) -> TestGateway {
    let gateway = prepare_gateway(&gateway_config(routes)).unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    let server = tokio::spawn(async move {
        HttpServer::new(gateway)
            .run(listener, server_shutdown)
            .await
            .unwrap();
    });

    TestGateway {
        addr,
        scheme: "http",
        shutdown,
        server: Some(server),
    }
}

/// Same as `spawn_gateway`, but the listener terminates TLS with the test server identity.
pub async fn spawn_tls_gateway(routes: Vec<RouteConfig>, grace: Duration) -> TestGateway {
    let gateway = prepare_gateway(&gateway_config(routes)).unwrap();
    let tls = load_tls_config(&fixture("server.crt"), &fixture("server.key")).unwrap();

    let addr = unused_addr().await;
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    let server = tokio::spawn(async move {
        HttpServer::new(gateway)
            .run_tls(addr, tls, grace, server_shutdown)
            .await
            .unwrap();
    });
    wait_for_listener(addr).await;

    TestGateway {
        addr,
        scheme: "https",
        shutdown,
        server: Some(server),
    }
}

async fn wait_for_listener(addr: SocketAddr) {
    for _ in 0..100 {
        if TcpStream::connect(addr).await.is_ok() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("listener on {addr} never came up");
}

/// Start a plain HTTP backend that describes every request it receives as JSON.
///
/// Paths ending in `/teapot` answer 418 with a fixed body instead; paths
/// ending in `/slow` answer "slow done" after half a second.
pub async fn start_echo_backend(name: &'static str) -> SocketAddr {
    let app = Router::new().fallback(move |request: Request<Body>| echo(name, request));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

async fn echo(name: &'static str, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();

    if parts.uri.path().ends_with("/teapot") {
        return (
            StatusCode::IM_A_TEAPOT,
            [("x-backend", name), ("keep-alive", "timeout=5")],
            "short and stout",
        )
            .into_response();
    }

    if parts.uri.path().ends_with("/slow") {
        tokio::time::sleep(Duration::from_millis(500)).await;
        return (StatusCode::OK, "slow done").into_response();
    }

    let body = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();
    let headers: Map<String, Value> = parts
        .headers
        .iter()
        .map(|(k, v)| (k.to_string(), Value::from(v.to_str().unwrap_or_default())))
        .collect();

    Json(json!({
        "backend": name,
        "method": parts.method.as_str(),
        "path": parts.uri.path(),
        "query": parts.uri.query(),
        "headers": headers,
        "body": String::from_utf8_lossy(&body),
    }))
    .into_response()
}

/// Start a backend whose handler never answers.
///
/// The receiver yields `"started"` when a request arrives and `"dropped"`
/// when its handler is torn down.
pub async fn start_hanging_backend() -> (SocketAddr, mpsc::UnboundedReceiver<&'static str>) {
    let (events, received) = mpsc::unbounded_channel();
    let app = Router::new().fallback(move || hang(events.clone()));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (addr, received)
}

struct DropSignal(mpsc::UnboundedSender<&'static str>);

impl Drop for DropSignal {
    fn drop(&mut self) {
        let _ = self.0.send("dropped");
    }
}

async fn hang(events: mpsc::UnboundedSender<&'static str>) -> StatusCode {
    let _ = events.send("started");
    let _signal = DropSignal(events);
    std::future::pending::<()>().await;
    StatusCode::OK
}

/// An address nothing is listening on.
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Start an HTTPS backend that requires a client certificate signed by the test CA.
///
/// Returns the address and a counter of accepted TCP connections.
pub async fn start_mtls_backend(cert: &str, key: &str) -> (SocketAddr, Arc<AtomicUsize>) {
    let provider = crypto_provider();
    let roots = load_root_store(&fixture("ca.crt")).unwrap();
    let verifier = WebPkiClientVerifier::builder_with_provider(Arc::new(roots), provider.clone())
        .build()
        .unwrap();
    let config = ServerConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .unwrap()
        .with_client_cert_verifier(verifier)
        .with_single_cert(
            load_certs(&fixture(cert)).unwrap(),
            load_private_key(&fixture(key)).unwrap(),
        )
        .unwrap();
    let acceptor = TlsAcceptor::from(Arc::new(config));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accepted = Arc::new(AtomicUsize::new(0));
    let counter = accepted.clone();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            let acceptor = acceptor.clone();
            tokio::spawn(async move {
                let Ok(tls) = acceptor.accept(stream).await else {
                    return;
                };
                let client_cert = tls
                    .get_ref()
                    .1
                    .peer_certificates()
                    .is_some_and(|certs| !certs.is_empty());

                let service = service_fn(move |request: Request<Incoming>| async move {
                    let body = format!("mtls {} client_cert={}", request.uri(), client_cert);
                    Ok::<_, Infallible>(hyper::Response::new(Body::from(body)))
                });
                let _ = http1::Builder::new()
                    .serve_connection(TokioIo::new(tls), service)
                    .await;
            });
        }
    });

    (addr, accepted)
}
