//! CORS handling.
//!
//! Preflight OPTIONS requests short-circuit here with the gateway's fixed
//! allow-lists. For everything else the forwarding engine is the CORS
//! authority on proxied responses; this layer only back-fills the CORS set
//! on responses produced inside the gateway itself (errors, health, root),
//! so that every response carries exactly one Access-Control-Allow-Origin.

use axum::extract::Request;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::proxy::headers::apply_cors;

pub async fn cors(request: Request, next: Next) -> Response {
    let origin = request.headers().get(header::ORIGIN).cloned();

    if request.method() == Method::OPTIONS {
        tracing::debug!(path = %request.uri().path(), "handling CORS preflight");
        let mut response = StatusCode::OK.into_response();
        apply_cors(response.headers_mut(), origin.as_ref());
        response.headers_mut().insert(
            header::ACCESS_CONTROL_MAX_AGE,
            HeaderValue::from_static("3600"),
        );
        return response;
    }

    let mut response = next.run(request).await;
    if !response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
    {
        apply_cors(response.headers_mut(), origin.as_ref());
    }
    response
}
