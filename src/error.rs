//! Gateway error taxonomy.
//!
//! # Design Decisions
//! - Every failure is terminal for the current request; the gateway never
//!   retries on the caller's behalf.
//! - Internal detail (upstream addresses, transport errors) is logged at the
//!   failure site and never leaked in the client-facing message.
//! - A lost client connection mid-stream is not an error and has no variant
//!   here; the streaming relay handles it as expected termination.

use axum::http::StatusCode;
use thiserror::Error;

use crate::directory::DirectoryError;

/// Terminal request failures, mapped one-to-one onto HTTP statuses.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The path is missing the API prefix or the service segment.
    #[error("invalid API path: {0}")]
    MalformedPath(String),

    /// The directory returned zero healthy instances for the service.
    #[error("service {0} has no healthy instances")]
    ServiceNotFound(String),

    /// The directory itself could not be reached.
    #[error("service directory unavailable: {0}")]
    DirectoryUnavailable(String),

    /// The resolved endpoint refused the connection or timed out.
    #[error("upstream request failed: {0}")]
    UpstreamConnect(String),

    /// Missing, malformed, or rejected bearer token.
    #[error("authentication denied: {0}")]
    AuthDenied(String),

    /// Anything unexpected; the recovery layer also maps panics here.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// HTTP status this failure surfaces as.
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::MalformedPath(_) => StatusCode::BAD_REQUEST,
            GatewayError::ServiceNotFound(_) | GatewayError::DirectoryUnavailable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            GatewayError::UpstreamConnect(_) => StatusCode::BAD_GATEWAY,
            GatewayError::AuthDenied(_) => StatusCode::UNAUTHORIZED,
            GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the client. Transport detail stays in the logs.
    pub fn client_message(&self) -> String {
        match self {
            GatewayError::MalformedPath(_) => "invalid API path format".to_string(),
            GatewayError::ServiceNotFound(name) => format!("service {name} not available"),
            GatewayError::DirectoryUnavailable(_) => "service directory unavailable".to_string(),
            GatewayError::UpstreamConnect(_) => "upstream request failed".to_string(),
            GatewayError::AuthDenied(reason) => reason.clone(),
            GatewayError::Internal(_) => "internal server error".to_string(),
        }
    }
}

impl From<DirectoryError> for GatewayError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::NotFound(name) => GatewayError::ServiceNotFound(name),
            DirectoryError::Unavailable(detail) => GatewayError::DirectoryUnavailable(detail),
        }
    }
}
