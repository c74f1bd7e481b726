//! The cross-cutting request pipeline.
//!
//! # Ordering (outermost first)
//! ```text
//! recovery      — contain panics, map to 500
//! access_log    — timing + status, evaluates the streaming flag once
//! cors          — OPTIONS preflight short-circuit, CORS back-fill
//! auth_gate     — bearer-token enforcement with bypass list
//! ```
//!
//! Each stage is an axum middleware function; composition happens once in
//! `server.rs` and is immutable afterwards, so the order is auditable in a
//! single place.

pub mod access_log;
pub mod auth_gate;
pub mod cors;
pub mod recovery;

pub use access_log::access_log;
pub use auth_gate::auth_gate;
pub use cors::cors;
pub use recovery::recovery;
