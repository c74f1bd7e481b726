//! Structured JSON error responses.
//!
//! Every error the gateway emits itself carries the same stable field set,
//! so API clients and browsers can handle failures uniformly.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error::GatewayError;

/// Stable error body shape for all gateway-emitted failures.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
    pub code: u16,
}

/// Build a JSON error response for the given status and message.
pub fn error_response(status: StatusCode, message: &str) -> Response {
    let body = ErrorBody {
        error: status
            .canonical_reason()
            .unwrap_or("Unknown")
            .to_string(),
        message: message.to_string(),
        code: status.as_u16(),
    };
    (status, Json(body)).into_response()
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        error_response(self.status(), &self.client_message())
    }
}
