//! Service directory subsystem.
//!
//! # Data Flow
//! ```text
//! logical service name
//!     → ServiceDirectory::resolve
//!     → registry HTTP query (healthy instances only)
//!     → first healthy entry → Endpoint { host, port }
//! ```
//!
//! # Design Decisions
//! - Resolution happens fresh on every request; no endpoint cache and
//!   therefore no invalidation problem
//! - First healthy entry wins; load balancing is out of scope
//! - A single failed query surfaces immediately; no retries
//! - Trait seam so tests can substitute an in-process double

pub mod client;

pub use client::{DirectoryError, Endpoint, HttpDirectory, ServiceDirectory};
