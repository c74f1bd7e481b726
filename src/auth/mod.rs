//! Authentication subsystem.
//!
//! # Data Flow
//! ```text
//! Authorization header
//!     → auth gate middleware (http/middleware/auth_gate.rs)
//!     → Authenticator::validate (this module)
//!     → directory-resolved identity service, bounded timeout
//!     → 2xx = pass, anything else = denial (fail closed)
//! ```
//!
//! # Design Decisions
//! - The gateway never inspects token claims; validity is delegated
//!   entirely to the identity service
//! - Trait seam so tests can substitute a double

pub mod authenticator;

pub use authenticator::{AuthError, Authenticator, RemoteAuthenticator};
