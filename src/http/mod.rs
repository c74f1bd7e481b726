//! HTTP surface subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum setup, graceful shutdown)
//!     → middleware/ (recovery → access log → CORS → auth gate)
//!     → gateway handler (resolve path → directory → forwarder)
//!     → response to client
//! ```

pub mod error;
pub mod middleware;
pub mod server;

pub use error::error_response;
pub use server::{AppState, GatewayServer};
