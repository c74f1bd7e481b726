//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check the routing prefix shape the resolver depends on
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic validation failure.
#[derive(Debug)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate the whole configuration, collecting every failure.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError {
            field: "server.bind_address",
            message: format!("not a valid socket address: {}", config.server.bind_address),
        });
    }

    let prefix = &config.routing.api_prefix;
    if !prefix.starts_with('/') || !prefix.ends_with('/') || prefix.len() < 2 {
        errors.push(ValidationError {
            field: "routing.api_prefix",
            message: format!("must start and end with '/': {prefix}"),
        });
    }

    match Url::parse(&config.directory.address) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError {
            field: "directory.address",
            message: format!("unsupported scheme: {}", url.scheme()),
        }),
        Err(e) => errors.push(ValidationError {
            field: "directory.address",
            message: e.to_string(),
        }),
    }

    if config.directory.timeout_secs == 0 {
        errors.push(ValidationError {
            field: "directory.timeout_secs",
            message: "must be greater than zero".to_string(),
        });
    }

    if config.auth.timeout_secs == 0 {
        errors.push(ValidationError {
            field: "auth.timeout_secs",
            message: "must be greater than zero".to_string(),
        });
    }

    if !config.auth.validate_path.starts_with('/') {
        errors.push(ValidationError {
            field: "auth.validate_path",
            message: format!("must start with '/': {}", config.auth.validate_path),
        });
    }

    if config.timeouts.connect_secs == 0 || config.timeouts.request_secs == 0 {
        errors.push(ValidationError {
            field: "timeouts",
            message: "connect_secs and request_secs must be greater than zero".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
