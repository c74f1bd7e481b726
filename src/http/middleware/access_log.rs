//! Access logging.
//!
//! Records method, path, remote address, duration, and final status for
//! every request. Also the single evaluation point for the streaming flag:
//! it is computed here from the Accept header and path, stored in the
//! request extensions, and read by the auth gate and the forwarding engine.

use std::net::SocketAddr;
use std::time::Instant;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use crate::http::server::AppState;
use crate::routing::{is_streaming, StreamingFlag};

pub async fn access_log(
    State(state): State<AppState>,
    ConnectInfo(remote): ConnectInfo<SocketAddr>,
    mut request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let accept = request
        .headers()
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let streaming = is_streaming(accept.as_deref(), &path, &state.config.streaming);
    request.extensions_mut().insert(StreamingFlag(streaming));

    tracing::debug!(
        method = %method,
        path = %path,
        remote_addr = %remote,
        accept = accept.as_deref().unwrap_or(""),
        streaming,
        "incoming request"
    );

    let start = Instant::now();
    let response = next.run(request).await;
    let elapsed = start.elapsed();
    let status = response.status().as_u16();

    // Streaming responses return here as soon as headers are committed; the
    // body stays open, so the log wording differs.
    if streaming {
        tracing::info!(
            method = %method,
            path = %path,
            remote_addr = %remote,
            status,
            elapsed_ms = elapsed.as_millis() as u64,
            "streaming connection established"
        );
    } else {
        tracing::info!(
            method = %method,
            path = %path,
            remote_addr = %remote,
            status,
            elapsed_ms = elapsed.as_millis() as u64,
            "request completed"
        );
    }

    response
}
