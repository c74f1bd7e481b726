//! Response header rewriting.
//!
//! Exact header names and values here are browser-interoperability
//! requirements: CORS preflight and SSE framing depend on them.

use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};

/// Methods the gateway allows cross-origin.
pub const ALLOWED_METHODS: &str = "GET, POST, PUT, PATCH, DELETE, OPTIONS";

/// Request headers the gateway allows cross-origin.
pub const ALLOWED_HEADERS: &str = "Content-Type, Authorization, Cache-Control";

/// Exposed response headers for regular JSON/file responses.
const EXPOSED_HEADERS_STANDARD: &str = "Content-Disposition, Content-Type, Content-Length";

/// Exposed response headers for event streams.
const EXPOSED_HEADERS_STREAMING: &str = "Content-Type, Cache-Control, Connection";

/// Reverse-proxy buffering hint understood by nginx-style intermediaries.
const X_ACCEL_BUFFERING: HeaderName = HeaderName::from_static("x-accel-buffering");

/// Set the gateway's CORS allow headers: echo the request origin (with
/// credentials) when present, `*` otherwise.
pub fn apply_cors(headers: &mut HeaderMap, origin: Option<&HeaderValue>) {
    match origin {
        Some(origin) => {
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
                HeaderValue::from_static("true"),
            );
        }
        None => {
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_ORIGIN,
                HeaderValue::from_static("*"),
            );
        }
    }
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );
}

/// Rewrite an upstream response's headers before it reaches the client.
///
/// Removes any backend-supplied CORS headers, applies the gateway's own CORS
/// set, and for streams forces the SSE framing headers while stripping the
/// body-length headers a live stream must not carry.
pub fn rewrite_response(headers: &mut HeaderMap, origin: Option<&HeaderValue>, streaming: bool) {
    // Backend CORS headers must never reach the client.
    headers.remove(header::ACCESS_CONTROL_ALLOW_ORIGIN);
    headers.remove(header::ACCESS_CONTROL_ALLOW_METHODS);
    headers.remove(header::ACCESS_CONTROL_ALLOW_HEADERS);
    headers.remove(header::ACCESS_CONTROL_ALLOW_CREDENTIALS);
    headers.remove(header::ACCESS_CONTROL_EXPOSE_HEADERS);
    headers.remove(header::ACCESS_CONTROL_MAX_AGE);

    apply_cors(headers, origin);

    if streaming {
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/event-stream; charset=utf-8"),
        );
        headers.insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-cache, no-transform"),
        );
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert(X_ACCEL_BUFFERING, HeaderValue::from_static("no"));
        headers.insert(
            header::ACCESS_CONTROL_EXPOSE_HEADERS,
            HeaderValue::from_static(EXPOSED_HEADERS_STREAMING),
        );
        // A live stream has no fixed length and must not be re-framed.
        headers.remove(header::CONTENT_LENGTH);
        headers.remove(header::TRANSFER_ENCODING);
    } else {
        headers.insert(
            header::ACCESS_CONTROL_EXPOSE_HEADERS,
            HeaderValue::from_static(EXPOSED_HEADERS_STANDARD),
        );
    }
}
