//! Sign Up Use Case
//!
//! Creates a new user account.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::{NewUser, User, UserProfile};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email,
    person_name::PersonName,
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Sign up input
pub struct SignUpInput {
    pub name: String,
    pub email: String,
    pub user_name: String,
    pub password: String,
}

/// Sign up output
pub struct SignUpOutput {
    pub user: User,
}

/// Sign up use case
pub struct SignUpUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> SignUpUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<SignUpOutput> {
        let user = register(
            self.repo.as_ref(),
            &self.config,
            Registration {
                name: input.name,
                email: input.email,
                user_name: Some(input.user_name),
                password: input.password,
                profile: UserProfile::default(),
            },
        )
        .await?;

        tracing::info!(user_id = %user.id, "User signed up");

        Ok(SignUpOutput { user })
    }
}

/// Unvalidated account data shared by sign-up and admin user creation.
pub(crate) struct Registration {
    pub name: String,
    pub email: String,
    pub user_name: Option<String>,
    pub password: String,
    pub profile: UserProfile,
}

/// Validate, check uniqueness, hash and persist.
pub(crate) async fn register<R>(repo: &R, config: &AuthConfig, input: Registration) -> AuthResult<User>
where
    R: UserRepository,
{
    let name = PersonName::new(input.name)?;
    let email = Email::new(input.email)?;
    let user_name = input.user_name.map(UserName::new).transpose()?;
    let raw_password = RawPassword::new(input.password)?;

    if repo
        .exists_by_email_or_user_name(
            Some(email.as_str()),
            user_name.as_ref().map(|n| n.as_str()),
            None,
        )
        .await?
    {
        return Err(AuthError::DuplicateIdentity);
    }

    let password = UserPassword::from_raw(&raw_password, config.pepper())?;

    repo.create(&NewUser::new(name, email, user_name, password, input.profile))
        .await
}
