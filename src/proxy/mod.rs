//! Proxy subsystem: the forwarding engine.
//!
//! # Data Flow
//! ```text
//! Resolved endpoint + forwarded path + streaming flag + inbound request
//!     → forwarder.rs (URI rewrite, upstream exchange)
//!     → headers.rs (response header rewrite: CORS authority, SSE framing)
//!     → response streamed back to the client
//! ```
//!
//! # Design Decisions
//! - The gateway is the sole authority on CORS; backend CORS headers are
//!   removed before the gateway's own set is applied
//! - Streaming responses relay each upstream write immediately and carry
//!   no whole-exchange deadline
//! - Upstream failures map to a generic 502; detail stays in the logs

pub mod forwarder;
pub mod headers;

pub use forwarder::Forwarder;
