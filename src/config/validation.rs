//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate listener address and trust material paths
//! - Reject routes that can never resolve
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Route URL syntax is checked per request, not here; a broken route
//!   answers 500 while the others keep serving

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::GatewayConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("route #{index} has an empty prefix")]
    EmptyRoutePrefix { index: usize },

    #[error("route '{prefix}' has an empty url")]
    EmptyRouteUrl { prefix: String },

    #[error("invalid bind address '{address}'")]
    InvalidBindAddress { address: String },

    #[error("{field} must not be empty")]
    EmptyPath { field: &'static str },
}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress {
            address: config.listener.bind_address.clone(),
        });
    }

    if let Some(tls) = &config.listener.tls {
        check_path(&mut errors, "listener.tls.cert_path", &tls.cert_path);
        check_path(&mut errors, "listener.tls.key_path", &tls.key_path);
    }

    let upstream = &config.upstream_tls;
    check_path(&mut errors, "upstream_tls.ca_cert_path", &upstream.ca_cert_path);
    check_path(&mut errors, "upstream_tls.client_cert_path", &upstream.client_cert_path);
    check_path(&mut errors, "upstream_tls.client_key_path", &upstream.client_key_path);

    for (index, route) in config.routes.iter().enumerate() {
        if route.prefix.is_empty() {
            errors.push(ValidationError::EmptyRoutePrefix { index });
        }
        if route.url.trim().is_empty() {
            errors.push(ValidationError::EmptyRouteUrl {
                prefix: route.prefix.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_path(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        errors.push(ValidationError::EmptyPath { field });
    }
}
