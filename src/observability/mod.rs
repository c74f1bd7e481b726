//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging via `tracing`; JSON format for production, pretty
//!   format for development, switched by config
//! - `RUST_LOG` overrides the configured level when set

pub mod logging;
