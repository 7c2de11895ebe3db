//! Sign In Use Case
//!
//! Authenticates a user and issues an access token.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::application::authenticate::Authenticator;
use crate::application::config::AuthConfig;
use crate::application::token::TokenIssuer;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    /// Email or user name
    pub identifier: String,
    pub password: String,
}

/// Sign in output
pub struct SignInOutput {
    pub access_token: String,
    pub user: User,
}

/// Sign in use case
pub struct SignInUseCase<R>
where
    R: UserRepository,
{
    authenticator: Authenticator<R>,
    issuer: Arc<TokenIssuer>,
}

impl<R> SignInUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>, issuer: Arc<TokenIssuer>) -> Self {
        Self {
            authenticator: Authenticator::new(repo, config),
            issuer,
        }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        let Some(user) = self
            .authenticator
            .authenticate(&input.identifier, &input.password)
            .await?
        else {
            return Err(AuthError::InvalidCredentials);
        };

        // Convenience only; authorization reads `sub`.
        let mut claims = Map::new();
        claims.insert("email".to_string(), Value::String(user.email.to_string()));

        let access_token = self.issuer.issue(user.id, claims, None)?;

        tracing::info!(user_id = %user.id, "User signed in");

        Ok(SignInOutput { access_token, user })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::sign_up::{SignUpInput, SignUpUseCase};
    use crate::application::token::TokenValidator;
    use crate::infra::memory::InMemoryAuthRepository;

    #[tokio::test]
    async fn test_sign_in_issues_token_for_user() {
        let config = Arc::new(AuthConfig::new("sign-in-secret"));
        let repo = Arc::new(InMemoryAuthRepository::new());
        let created = SignUpUseCase::new(repo.clone(), config.clone())
            .execute(SignUpInput {
                name: "A".to_string(),
                email: "a@x.com".to_string(),
                user_name: "a1".to_string(),
                password: "pw".to_string(),
            })
            .await
            .unwrap()
            .user;

        let sign_in = SignInUseCase::new(repo, config.clone(), Arc::new(TokenIssuer::new(&config)));
        let output = sign_in
            .execute(SignInInput {
                identifier: "a1".to_string(),
                password: "pw".to_string(),
            })
            .await
            .unwrap();

        let claims = TokenValidator::new(&config).validate(&output.access_token).unwrap();
        assert_eq!(claims.subject(), Some(created.id));
        assert_eq!(claims.extra.get("email"), Some(&Value::from("a@x.com")));

        let wrong = sign_in
            .execute(SignInInput {
                identifier: "a@x.com".to_string(),
                password: "wrong".to_string(),
            })
            .await;
        assert!(matches!(wrong, Err(AuthError::InvalidCredentials)));
    }
}
