//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → resolver.rs (prefix check, segment extraction, alias table)
//!     → RouteCandidate { registry name, forwarded path }
//!
//! Accept header + path
//!     → streaming.rs (single shared predicate)
//!     → StreamingFlag threaded through the pipeline via request extensions
//! ```
//!
//! # Design Decisions
//! - The resolver is a pure function; rejection happens before any
//!   directory lookup
//! - The alias table is immutable configuration, shared read-only
//! - Streaming detection is evaluated exactly once per request; every
//!   pipeline stage reads the same flag

pub mod resolver;
pub mod streaming;

pub use resolver::{resolve_path, RouteCandidate};
pub use streaming::{is_streaming, StreamingFlag, EVENT_STREAM_MEDIA_TYPE};
