//! Authorize Use Case
//!
//! Resolves a bearer token to the user it was issued for. Every failure is
//! reported as `AuthError::InvalidToken`; which check failed is only logged.

use std::sync::Arc;

use crate::application::token::{Claims, TokenValidator};
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

/// The principal of one request. Lives in request extensions only.
#[derive(Debug, Clone)]
pub struct AuthenticatedIdentity {
    pub user: User,
    pub claims: Claims,
}

pub struct AuthorizeUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    validator: Arc<TokenValidator>,
}

impl<R> AuthorizeUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, validator: Arc<TokenValidator>) -> Self {
        Self { repo, validator }
    }

    pub async fn execute(&self, token: &str) -> AuthResult<AuthenticatedIdentity> {
        let claims = self
            .validator
            .validate(token)
            .map_err(|_| AuthError::InvalidToken)?;

        let Some(user_id) = claims.subject() else {
            tracing::debug!("Token subject is not a user id");
            return Err(AuthError::InvalidToken);
        };

        let Some(user) = self.repo.find_by_id(user_id).await? else {
            tracing::debug!(user_id = %user_id, "Token subject no longer exists");
            return Err(AuthError::InvalidToken);
        };

        Ok(AuthenticatedIdentity { user, claims })
    }
}
