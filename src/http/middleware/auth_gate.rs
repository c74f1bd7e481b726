//! Bearer-token auth gate.
//!
//! Decides per path whether a token must be validated, short-circuiting
//! with 401 on failure. Bypassed for the health check, the root path, the
//! identity service's own public prefixes, and streaming endpoints (the
//! EventSource transport cannot attach custom headers, so requiring a token
//! there is impossible; this is an accepted trust boundary relaxation).
//!
//! 401 responses attach the CORS headers directly so browser clients can
//! read the error body. This duplicates the CORS layer's work on purpose:
//! the short-circuit must be correct on its own.

use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::Response;

use crate::http::error::error_response;
use crate::http::server::AppState;
use crate::proxy::headers::apply_cors;
use crate::routing::{is_streaming, StreamingFlag};

pub async fn auth_gate(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let auth_config = &state.config.auth;
    if !auth_config.enabled {
        return next.run(request).await;
    }

    let path = request.uri().path();
    let streaming = match request.extensions().get::<StreamingFlag>() {
        Some(flag) => flag.0,
        None => {
            let accept = request
                .headers()
                .get(header::ACCEPT)
                .and_then(|v| v.to_str().ok());
            is_streaming(accept, path, &state.config.streaming)
        }
    };

    let public = path == "/health"
        || path == "/"
        || auth_config
            .public_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()));
    if public || streaming {
        return next.run(request).await;
    }

    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty());

    let Some(token) = token else {
        tracing::warn!(path = %path, "missing or malformed authorization header");
        return deny(&request, "missing or invalid authorization header");
    };

    match state.authenticator.validate(token).await {
        Ok(()) => next.run(request).await,
        Err(error) => {
            tracing::warn!(path = %path, %error, "token validation failed");
            deny(&request, "invalid token")
        }
    }
}

fn deny(request: &Request, message: &str) -> Response {
    let origin = request.headers().get(header::ORIGIN);
    let mut response = error_response(StatusCode::UNAUTHORIZED, message);
    apply_cors(response.headers_mut(), origin);
    response
}
