//! The forwarding engine.
//!
//! # Responsibilities
//! - Rewrite the request URI to the resolved endpoint
//! - Strip hop-by-hop headers in both directions
//! - Forward the exchange over a shared upstream client
//! - Apply the response header rewrite (CORS authority, SSE framing)
//! - Relay streaming bodies write-by-write with no added latency
//!
//! # Design Decisions
//! - Non-streaming exchanges carry a whole-exchange deadline; streaming
//!   exchanges only a connect timeout, since they are long-lived by design
//! - Upstream frames are handed to the connection as they arrive, so the
//!   client observes each event before the next upstream write happens
//! - A client that disappears mid-stream is the expected termination path:
//!   the relay logs it at debug and ends, it never becomes a 500

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::extract::Request;
use axum::http::uri::Scheme;
use axum::http::{header, HeaderMap, HeaderName, Uri, Version};
use axum::response::Response;
use futures_util::Stream;
use http_body_util::BodyExt;
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use tokio::time::{sleep_until, Instant, Sleep};

use crate::config::TimeoutConfig;
use crate::directory::Endpoint;
use crate::error::GatewayError;
use crate::proxy::headers::rewrite_response;

/// Headers that describe the connection, not the message; never forwarded.
const HOP_BY_HOP: [HeaderName; 8] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// Forwards requests to resolved endpoints over a shared HTTP client.
///
/// The client is reentrant and shared by all in-flight requests; per-request
/// state lives entirely in the arguments.
pub struct Forwarder {
    client: Client<HttpConnector, Body>,
    request_timeout: Duration,
}

impl Forwarder {
    pub fn new(config: &TimeoutConfig) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(config.connect_secs)));
        let client = Client::builder(TokioExecutor::new()).build(connector);
        Self {
            client,
            request_timeout: Duration::from_secs(config.request_secs),
        }
    }

    /// Forward the request to `endpoint` under `forward_path` and hand the
    /// upstream response back with rewritten headers.
    pub async fn forward(
        &self,
        endpoint: &Endpoint,
        forward_path: &str,
        streaming: bool,
        request: Request,
    ) -> Result<Response, GatewayError> {
        let (mut parts, body) = request.into_parts();
        let origin = parts.headers.get(header::ORIGIN).cloned();

        strip_connection_headers(&mut parts.headers);
        // Host is derived from the rewritten URI.
        parts.headers.remove(header::HOST);

        let path_and_query = match parts.uri.query() {
            Some(query) => format!("{forward_path}?{query}"),
            None => forward_path.to_string(),
        };
        let target = endpoint.authority();
        parts.uri = Uri::builder()
            .scheme(Scheme::HTTP)
            .authority(target.as_str())
            .path_and_query(path_and_query.as_str())
            .build()
            .map_err(|e| GatewayError::Internal(format!("bad upstream uri: {e}")))?;
        parts.version = Version::HTTP_11;

        let upstream_request = Request::from_parts(parts, body);

        // The deadline covers the whole exchange: headers and body.
        let deadline = Instant::now() + self.request_timeout;

        let result = if streaming {
            // No response deadline: event streams stay open indefinitely.
            self.client.request(upstream_request).await
        } else {
            match tokio::time::timeout_at(deadline, self.client.request(upstream_request)).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::error!(upstream = %target, "upstream response deadline exceeded");
                    return Err(GatewayError::UpstreamConnect(format!(
                        "deadline exceeded contacting {target}"
                    )));
                }
            }
        };

        let upstream_response = result.map_err(|e| {
            tracing::error!(upstream = %target, error = %e, streaming, "upstream request failed");
            GatewayError::UpstreamConnect(e.to_string())
        })?;

        let (mut parts, body) = upstream_response.into_parts();
        strip_connection_headers(&mut parts.headers);
        rewrite_response(&mut parts.headers, origin.as_ref(), streaming);

        let body = if streaming {
            tracing::debug!(upstream = %target, "event stream opened, relaying write-by-write");
            Body::from_stream(StreamRelay::new(body, target))
        } else {
            Body::from_stream(DeadlineBody::new(body, deadline, target))
        };

        Ok(Response::from_parts(parts, body))
    }
}

/// Remove hop-by-hop headers: the fixed RFC 9110 set plus any header
/// nominated by name in the Connection header's value.
fn strip_connection_headers(headers: &mut HeaderMap) {
    let nominated: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|name| name.trim().parse::<HeaderName>().ok())
        .collect();
    for name in nominated {
        headers.remove(name);
    }
    for name in HOP_BY_HOP {
        headers.remove(name);
    }
}

/// Bounds a non-streaming response body by the whole-exchange deadline.
///
/// The deadline armed before the upstream request keeps running while the
/// body is relayed; a body still trickling when it fires is cut with an
/// error so the client observes a truncated transfer instead of a hang.
struct DeadlineBody {
    inner: Pin<Box<dyn Stream<Item = Result<Bytes, hyper::Error>> + Send + 'static>>,
    deadline: Pin<Box<Sleep>>,
    target: String,
    expired: bool,
}

impl DeadlineBody {
    fn new(body: hyper::body::Incoming, deadline: Instant, target: String) -> Self {
        Self {
            inner: Box::pin(body.into_data_stream()),
            deadline: Box::pin(sleep_until(deadline)),
            target,
            expired: false,
        }
    }
}

impl Stream for DeadlineBody {
    type Item = Result<Bytes, std::io::Error>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.expired {
            return Poll::Ready(None);
        }
        if this.deadline.as_mut().poll(cx).is_ready() {
            this.expired = true;
            tracing::error!(upstream = %this.target, "upstream body deadline exceeded");
            return Poll::Ready(Some(Err(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "upstream body deadline exceeded",
            ))));
        }
        match this.inner.as_mut().poll_next(cx) {
            Poll::Ready(Some(Ok(chunk))) => Poll::Ready(Some(Ok(chunk))),
            Poll::Ready(Some(Err(error))) => Poll::Ready(Some(Err(std::io::Error::other(error)))),
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Relays upstream body frames to the client one write at a time.
///
/// Termination handling: upstream EOF ends the stream normally; an upstream
/// transport error after headers were sent also ends it (there is no way to
/// change the status mid-stream); dropping the relay before the upstream
/// finished means the client went away, which is logged as an expected
/// termination, never as a failure.
struct StreamRelay {
    inner: Pin<Box<dyn Stream<Item = Result<Bytes, hyper::Error>> + Send + 'static>>,
    target: String,
    finished: bool,
}

impl StreamRelay {
    fn new(body: hyper::body::Incoming, target: String) -> Self {
        Self {
            inner: Box::pin(body.into_data_stream()),
            target,
            finished: false,
        }
    }
}

impl Stream for StreamRelay {
    type Item = Result<Bytes, Infallible>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        match this.inner.as_mut().poll_next(cx) {
            Poll::Ready(Some(Ok(chunk))) => Poll::Ready(Some(Ok(chunk))),
            Poll::Ready(Some(Err(error))) => {
                this.finished = true;
                tracing::debug!(upstream = %this.target, %error, "upstream closed event stream");
                Poll::Ready(None)
            }
            Poll::Ready(None) => {
                this.finished = true;
                tracing::debug!(upstream = %this.target, "event stream completed");
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for StreamRelay {
    fn drop(&mut self) {
        if !self.finished {
            tracing::debug!(upstream = %self.target, "client disconnected during event stream");
        }
    }
}
