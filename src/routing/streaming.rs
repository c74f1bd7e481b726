//! Streaming (server-sent events) detection.
//!
//! The flag governs transport timeouts, flush behavior, the response header
//! set, and the auth bypass, so it must be computed once per request and
//! threaded through the pipeline. The access-log middleware evaluates it and
//! stores a [`StreamingFlag`] in the request extensions; the auth gate and
//! the forwarding engine read that flag instead of re-deriving it.

use crate::config::StreamingConfig;

/// Media type that marks a server-sent-events request.
pub const EVENT_STREAM_MEDIA_TYPE: &str = "text/event-stream";

/// Per-request streaming flag carried in request extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamingFlag(pub bool);

/// Pure predicate: is this request a long-lived event stream?
///
/// True when the Accept header equals the event-stream media type, or the
/// path ends with one of the configured streaming suffixes.
pub fn is_streaming(accept: Option<&str>, path: &str, config: &StreamingConfig) -> bool {
    if accept.map(str::trim) == Some(EVENT_STREAM_MEDIA_TYPE) {
        return true;
    }
    config
        .path_suffixes
        .iter()
        .any(|suffix| path.ends_with(suffix.as_str()))
}
