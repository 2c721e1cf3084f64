//! Response handling and transformation.
//!
//! # Responsibilities
//! - Relay the backend response to the caller
//! - Map gateway-side failures to fixed, generic error responses
//!
//! # Design Decisions
//! - Streaming responses avoid buffering entire body
//! - Hop-by-hop headers stripped from relayed responses
//! - Error bodies never carry internal details

use axum::{
    body::Body,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use hyper::body::Incoming;

use crate::http::request::strip_hop_by_hop;

pub const NOT_FOUND_BODY: &str = "Not Found";
pub const INVALID_TARGET_BODY: &str = "Invalid target URL";
pub const BAD_GATEWAY_BODY: &str = "Upstream request failed";

/// No route matched the request path.
pub fn not_found() -> Response {
    (StatusCode::NOT_FOUND, NOT_FOUND_BODY).into_response()
}

/// The matched route produced a target that is not an absolute http(s) URL.
pub fn invalid_target() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, INVALID_TARGET_BODY).into_response()
}

/// The backend could not be reached or failed the TLS handshake.
pub fn bad_gateway() -> Response {
    (StatusCode::BAD_GATEWAY, BAD_GATEWAY_BODY).into_response()
}

/// Stream a backend response back to the caller.
pub fn relay(response: hyper::Response<Incoming>) -> Response {
    let (mut parts, body) = response.into_parts();
    strip_hop_by_hop(&mut parts.headers);
    Response::from_parts(parts, Body::new(body))
}
