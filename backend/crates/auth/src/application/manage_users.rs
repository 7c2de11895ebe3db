//! Manage Users Use Case
//!
//! List, create, update and delete accounts through the `/user` endpoints.

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::config::AuthConfig;
use crate::application::sign_up::{Registration, register};
use crate::domain::entity::user::{User, UserChanges, UserProfile};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email,
    person_name::PersonName,
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Create user input
pub struct CreateUserInput {
    pub name: String,
    pub email: String,
    pub user_name: Option<String>,
    pub password: String,
    pub profile: UserProfile,
}

/// Update user input. `None` leaves the field unchanged.
#[derive(Default)]
pub struct UpdateUserInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub user_name: Option<String>,
    pub password: Option<String>,
    pub dob: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
}

pub struct ManageUsersUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> ManageUsersUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    /// All users, newest first.
    pub async fn list(&self) -> AuthResult<Vec<User>> {
        self.repo.list().await
    }

    pub async fn create(&self, input: CreateUserInput) -> AuthResult<User> {
        let user = register(
            self.repo.as_ref(),
            &self.config,
            Registration {
                name: input.name,
                email: input.email,
                user_name: input.user_name,
                password: input.password,
                profile: input.profile,
            },
        )
        .await?;

        tracing::info!(user_id = %user.id, "User created");

        Ok(user)
    }

    pub async fn update(&self, id: UserId, input: UpdateUserInput) -> AuthResult<User> {
        let mut user = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let email = input.email.map(Email::new).transpose()?;
        let user_name = input.user_name.map(UserName::new).transpose()?;

        if (email.is_some() || user_name.is_some())
            && self
                .repo
                .exists_by_email_or_user_name(
                    email.as_ref().map(|e| e.as_str()),
                    user_name.as_ref().map(|n| n.as_str()),
                    Some(id),
                )
                .await?
        {
            return Err(AuthError::DuplicateIdentity);
        }

        let password = match input.password {
            Some(raw) => {
                let raw = RawPassword::new(raw)?;
                Some(UserPassword::from_raw(&raw, self.config.pepper())?)
            }
            None => None,
        };

        user.apply(UserChanges {
            name: input.name.map(PersonName::new).transpose()?,
            email,
            user_name,
            password,
            dob: input.dob,
            phone: input.phone,
            address: input.address,
            city: input.city,
        });

        self.repo.update(&user).await?;

        tracing::info!(user_id = %id, "User updated");

        Ok(user)
    }

    pub async fn delete(&self, id: UserId) -> AuthResult<()> {
        if !self.repo.delete(id).await? {
            return Err(AuthError::UserNotFound);
        }

        tracing::info!(user_id = %id, "User deleted");

        Ok(())
    }
}
