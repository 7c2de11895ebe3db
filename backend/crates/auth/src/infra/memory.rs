//! In-Memory Repository
//!
//! Process-local storage with the same uniqueness rules as the `users`
//! table. Backs the router tests; nothing is persisted.

use std::collections::BTreeMap;

use kernel::id::UserId;
use tokio::sync::RwLock;

use crate::domain::entity::user::{NewUser, User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

#[derive(Default)]
struct State {
    next_id: i64,
    users: BTreeMap<UserId, User>,
}

impl State {
    fn collides(&self, email: Option<&str>, user_name: Option<&str>, except: Option<UserId>) -> bool {
        let email = email.map(Email::normalize_lookup);
        self.users.values().any(|user| {
            if except == Some(user.id) {
                return false;
            }
            let email_taken = email.as_deref() == Some(user.email.as_str());
            let name_taken = user_name.is_some()
                && user_name == user.user_name.as_ref().map(|n| n.as_str());
            email_taken || name_taken
        })
    }
}

#[derive(Default)]
pub struct InMemoryAuthRepository {
    state: RwLock<State>,
}

impl InMemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserRepository for InMemoryAuthRepository {
    async fn create(&self, user: &NewUser) -> AuthResult<User> {
        let mut state = self.state.write().await;

        // Mirrors the UNIQUE constraints on email and user_name.
        if state.collides(
            Some(user.email.as_str()),
            user.user_name.as_ref().map(|n| n.as_str()),
            None,
        ) {
            return Err(AuthError::DuplicateIdentity);
        }

        state.next_id += 1;
        let created = user.clone().into_user(UserId::new(state.next_id));
        state.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: UserId) -> AuthResult<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_by_email_or_user_name(&self, identifier: &str) -> AuthResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|user| user.matches_identifier(identifier))
            .cloned())
    }

    async fn exists_by_email_or_user_name(
        &self,
        email: Option<&str>,
        user_name: Option<&str>,
        except: Option<UserId>,
    ) -> AuthResult<bool> {
        Ok(self.state.read().await.collides(email, user_name, except))
    }

    async fn list(&self) -> AuthResult<Vec<User>> {
        let state = self.state.read().await;
        let mut users: Vec<User> = state.users.values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(users)
    }

    async fn update(&self, user: &User) -> AuthResult<()> {
        let mut state = self.state.write().await;

        if !state.users.contains_key(&user.id) {
            return Err(AuthError::UserNotFound);
        }
        if state.collides(
            Some(user.email.as_str()),
            user.user_name.as_ref().map(|n| n.as_str()),
            Some(user.id),
        ) {
            return Err(AuthError::DuplicateIdentity);
        }

        state.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn delete(&self, id: UserId) -> AuthResult<bool> {
        Ok(self.state.write().await.users.remove(&id).is_some())
    }
}
