//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup: load config → init logging → bind listener → serve
//! Shutdown: SIGTERM/SIGINT → broadcast → stop accepting → drain → exit
//! ```
//!
//! # Design Decisions
//! - Shutdown has a bounded grace period; forced exit after the deadline
//! - A streaming connection in flight at the deadline observes a hard close

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
