//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::Deserialize;

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, inbound TLS).
    pub listener: ListenerConfig,

    /// Trust material used for every outbound call.
    pub upstream_tls: UpstreamTlsConfig,

    /// Route definitions mapping path prefixes to backend base URLs.
    pub routes: Vec<RouteConfig>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Optional TLS configuration for the inbound side.
    pub tls: Option<TlsConfig>,

    /// How long in-flight requests may drain after a shutdown signal.
    pub shutdown_grace_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            tls: None,
            shutdown_grace_secs: 10,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// Mutual TLS material presented to, and trusted from, backends.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamTlsConfig {
    /// CA certificate (PEM) backend server certificates must chain to.
    pub ca_cert_path: String,

    /// Client certificate chain (PEM) presented to backends.
    pub client_cert_path: String,

    /// Private key (PEM) matching `client_cert_path`.
    pub client_key_path: String,
}

impl Default for UpstreamTlsConfig {
    fn default() -> Self {
        Self {
            ca_cert_path: "config/ca.crt".to_string(),
            client_cert_path: "config/client.crt".to_string(),
            client_key_path: "config/client.key".to_string(),
        }
    }
}

/// A single `prefix -> url` binding.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RouteConfig {
    /// Path prefix to match.
    pub prefix: String,

    /// Backend base URL; the request path remainder is appended to it.
    pub url: String,
}

impl RouteConfig {
    pub fn new(prefix: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            url: url.into(),
        }
    }
}

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}
