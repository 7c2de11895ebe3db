//! Application Layer
//!
//! Use cases and application services.

pub mod authenticate;
pub mod authorize;
pub mod config;
pub mod manage_users;
pub mod sign_in;
pub mod sign_up;
pub mod token;

// Re-exports
pub use authenticate::Authenticator;
pub use authorize::{AuthenticatedIdentity, AuthorizeUseCase};
pub use config::AuthConfig;
pub use manage_users::{CreateUserInput, ManageUsersUseCase, UpdateUserInput};
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_up::{SignUpInput, SignUpOutput, SignUpUseCase};
pub use token::{Claims, TokenCheck, TokenError, TokenIssuer, TokenValidator};
