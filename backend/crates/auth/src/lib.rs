//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases, token issue/validation
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - HTTP handlers, DTOs, routers, authorization gate
//!
//! ## Features
//! - Sign up / sign in by email or user name
//! - Stateless HS256 bearer tokens (`sub` = user id)
//! - Authorization gate resolving the current user per request
//! - User management endpoints
//!
//! ## Security Model
//! - Passwords hashed with Argon2id; legacy SHA-256 digests verified and
//!   upgraded on login
//! - Tokens expire after `AuthConfig::token_ttl`; there is no revocation
//! - Every gate failure is the same 401 with a Bearer challenge

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::authorize::AuthenticatedIdentity;
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::{InMemoryAuthRepository, PgAuthRepository};
pub use presentation::handlers::AuthAppState;
pub use presentation::middleware::{CurrentUser, GateState, require_bearer};
pub use presentation::router::{auth_router, user_router};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
