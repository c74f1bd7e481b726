//! Edge Gateway Library
//!
//! An HTTP edge gateway that maps `/api/{service}/...` requests to backend
//! services through an external service directory, forwards them (including
//! long-lived server-sent-event streams), and applies a fixed cross-cutting
//! pipeline: recovery, access logging, CORS, bearer-token authentication.

// Core subsystems
pub mod config;
pub mod directory;
pub mod http;
pub mod proxy;
pub mod routing;

// Cross-cutting concerns
pub mod auth;
pub mod error;
pub mod lifecycle;
pub mod observability;

pub use config::schema::GatewayConfig;
pub use error::GatewayError;
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
