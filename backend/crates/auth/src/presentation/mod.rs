//! Presentation Layer
//!
//! HTTP handlers, DTOs, routers and the authorization gate.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::AuthAppState;
pub use middleware::{CurrentUser, GateState, require_bearer};
pub use router::{auth_router, user_router};
