//! Forwarding to the resolved backend.
//!
//! # Responsibilities
//! - Parse the resolved target URL
//! - Rewrite scheme, authority and path of the inbound request
//! - Send it through the shared transport and relay the response
//!
//! # Design Decisions
//! - The inbound query string rides along unchanged after the new path
//! - Method, headers (minus hop-by-hop) and body stream through untouched
//! - A bad target answers 500 without touching the network
//! - A transport failure answers 502; there is no retry

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{
        uri::{Authority, InvalidUri, Scheme},
        Request, Uri, Version,
    },
    response::Response,
};
use thiserror::Error;
use url::{Position, Url};

use crate::http::request::{append_forwarded_for, strip_hop_by_hop};
use crate::http::response;
use crate::net::ClientTransport;

/// Why a resolved target URL cannot be forwarded to.
#[derive(Debug, Error)]
pub enum InvalidTarget {
    #[error("{0}")]
    Parse(#[from] url::ParseError),

    #[error("unsupported scheme '{0}'")]
    Scheme(String),

    #[error("missing host")]
    MissingHost,

    #[error("invalid authority: {0}")]
    Authority(#[source] InvalidUri),

    #[error("invalid path: {0}")]
    Path(#[source] InvalidUri),
}

/// Where a single request is going: scheme, host and rewritten path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    scheme: Scheme,
    authority: Authority,
    path: String,
}

impl ResolvedTarget {
    /// Parse an absolute `http`/`https` URL.
    ///
    /// The path is taken as written: dot segments and percent-escapes are
    /// neither resolved nor re-encoded.
    pub fn parse(target_url: &str) -> Result<Self, InvalidTarget> {
        let url = Url::parse(target_url)?;

        let scheme = match url.scheme() {
            "http" => Scheme::HTTP,
            "https" => Scheme::HTTPS,
            other => return Err(InvalidTarget::Scheme(other.to_string())),
        };
        if url.host_str().map_or(true, str::is_empty) {
            return Err(InvalidTarget::MissingHost);
        }
        let authority = Authority::from_str(&url[Position::BeforeHost..Position::AfterPort])
            .map_err(InvalidTarget::Authority)?;
        let path = Uri::from_str(target_url)
            .map_err(InvalidTarget::Path)?
            .path()
            .to_string();

        Ok(Self {
            scheme,
            authority,
            path,
        })
    }

    pub fn scheme(&self) -> &Scheme {
        &self.scheme
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Point `request` at this target.
    pub fn rewrite(
        &self,
        request: Request<Body>,
        client: IpAddr,
    ) -> Result<Request<Body>, axum::http::Error> {
        let (mut parts, body) = request.into_parts();

        let path_and_query = match parts.uri.query() {
            Some(query) => format!("{}?{}", self.path, query),
            None => self.path.clone(),
        };
        parts.uri = Uri::builder()
            .scheme(self.scheme.clone())
            .authority(self.authority.clone())
            .path_and_query(path_and_query)
            .build()?;
        parts.version = Version::HTTP_11;

        strip_hop_by_hop(&mut parts.headers);
        append_forwarded_for(&mut parts.headers, client);

        Ok(Request::from_parts(parts, body))
    }
}

impl fmt::Display for ResolvedTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}{}", self.scheme, self.authority, self.path)
    }
}

/// Sends requests to resolved targets over the shared transport.
#[derive(Debug, Clone)]
pub struct Forwarder {
    transport: Arc<ClientTransport>,
}

impl Forwarder {
    pub fn new(transport: Arc<ClientTransport>) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &Arc<ClientTransport> {
        &self.transport
    }

    /// Forward `request` to `target_url` and return the caller's response.
    pub async fn forward(
        &self,
        target_url: &str,
        client: SocketAddr,
        request: Request<Body>,
    ) -> Response {
        let client_ip = client.ip();

        let target = match ResolvedTarget::parse(target_url) {
            Ok(target) => target,
            Err(e) => {
                tracing::error!(client = %client_ip, url = %target_url, error = %e, "Invalid target URL");
                return response::invalid_target();
            }
        };

        let outbound = match target.rewrite(request, client_ip) {
            Ok(outbound) => outbound,
            Err(e) => {
                tracing::error!(client = %client_ip, url = %target_url, error = %e, "Invalid target URL");
                return response::invalid_target();
            }
        };

        tracing::info!(target = %target, "Forwarding request");

        match self.transport.send(outbound).await {
            Ok(upstream) => response::relay(upstream),
            Err(e) => {
                tracing::error!(client = %client_ip, target = %target, error = ?e, "Upstream request failed");
                response::bad_gateway()
            }
        }
    }
}
