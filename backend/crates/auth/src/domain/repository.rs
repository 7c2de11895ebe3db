//! Repository Traits
//!
//! Persistence interface for users. Implementations live in `infra`.

use kernel::id::UserId;

use crate::domain::entity::user::{NewUser, User};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a user; storage assigns the id.
    async fn create(&self, user: &NewUser) -> AuthResult<User>;

    async fn find_by_id(&self, id: UserId) -> AuthResult<Option<User>>;

    /// Match on email (case-insensitive) or user name. First match wins.
    async fn find_by_email_or_user_name(&self, identifier: &str) -> AuthResult<Option<User>>;

    /// Whether another account already uses `email` or `user_name`.
    ///
    /// `None` arguments are not checked; `except` excludes one user (self on update).
    async fn exists_by_email_or_user_name(
        &self,
        email: Option<&str>,
        user_name: Option<&str>,
        except: Option<UserId>,
    ) -> AuthResult<bool>;

    /// All users, newest first.
    async fn list(&self) -> AuthResult<Vec<User>>;

    async fn update(&self, user: &User) -> AuthResult<()>;

    /// Returns false when nothing was deleted.
    async fn delete(&self, id: UserId) -> AuthResult<bool>;
}
