//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Root configuration for the edge gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, shutdown grace).
    pub server: ServerConfig,

    /// Path-to-service routing rules.
    pub routing: RoutingConfig,

    /// Streaming (server-sent events) detection.
    pub streaming: StreamingConfig,

    /// Service directory connection.
    pub directory: DirectoryConfig,

    /// Bearer-token authentication.
    pub auth: AuthConfig,

    /// Upstream timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener and lifecycle configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Seconds in-flight requests get to finish after the shutdown signal.
    pub shutdown_grace_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            shutdown_grace_secs: 10,
        }
    }
}

/// Routing rules: API prefix, alias table, legacy-name handling.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Fixed prefix every routed path must carry. Must start and end with '/'.
    pub api_prefix: String,

    /// Path segment → registry service name. A lookup miss means the segment
    /// itself is the registry name.
    pub service_aliases: HashMap<String, String>,

    /// Segments ending in one of these suffixes follow the legacy URL
    /// convention and are stripped before forwarding.
    pub legacy_suffixes: Vec<String>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            api_prefix: "/api/".to_string(),
            service_aliases: HashMap::new(),
            legacy_suffixes: vec!["-service".to_string()],
        }
    }
}

/// Streaming detection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// Paths ending in one of these suffixes are treated as long-lived
    /// event streams regardless of the Accept header.
    pub path_suffixes: Vec<String>,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            path_suffixes: vec!["/events".to_string()],
        }
    }
}

/// Service directory (registry) connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Base URL of the registry HTTP API.
    pub address: String,

    /// Timeout for a single directory query in seconds.
    pub timeout_secs: u64,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            address: "http://127.0.0.1:8500".to_string(),
            timeout_secs: 5,
        }
    }
}

/// Bearer-token authentication configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Enable token validation. When false every request passes through.
    pub enabled: bool,

    /// Registry name of the identity service tokens are validated against.
    pub service: String,

    /// Path on the identity service that validates a forwarded bearer token.
    pub validate_path: String,

    /// Timeout for the validation call in seconds.
    pub timeout_secs: u64,

    /// Path prefixes that never require a token (the identity service's own
    /// public surface, e.g. login and token refresh).
    pub public_prefixes: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            service: "auth-service".to_string(),
            validate_path: "/api/Auth/validate".to_string(),
            timeout_secs: 5,
            public_prefixes: vec!["/api/auth-service".to_string(), "/api/Auth".to_string()],
        }
    }
}

/// Upstream timeout configuration.
///
/// Streaming requests deliberately have no whole-exchange deadline; only the
/// connect timeout applies to them.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Whole-exchange deadline for non-streaming requests in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log format: "pretty" or "json".
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}
