//! Authenticator
//!
//! Resolves (identifier, password) to a user. Unknown identifier and wrong
//! password are indistinguishable to the caller: both yield `None`.

use std::sync::{Arc, OnceLock};

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_password::{RawPassword, UserPassword};
use crate::error::AuthResult;

pub struct Authenticator<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> Authenticator<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    /// `identifier` is an email (case-insensitive) or a user name (exact).
    pub async fn authenticate(&self, identifier: &str, password: &str) -> AuthResult<Option<User>> {
        // Input that could never have been stored cannot match.
        let Ok(raw) = RawPassword::new(password.to_string()) else {
            return Ok(None);
        };

        let Some(mut user) = self.repo.find_by_email_or_user_name(identifier).await? else {
            tracing::debug!("Login identifier did not match any user");
            // Same Argon2 cost as a real mismatch, so timing does not reveal
            // whether the identifier exists.
            if let Some(dummy) = dummy_hash() {
                let _ = dummy.verify(&raw, self.config.pepper());
            }
            return Ok(None);
        };

        if user.password.is_legacy() && !self.config.accept_legacy_hashes {
            tracing::warn!(user_id = %user.id, "Legacy password hash rejected by configuration");
            return Ok(None);
        }

        if !user.password.verify(&raw, self.config.pepper()) {
            tracing::debug!(user_id = %user.id, "Password mismatch");
            return Ok(None);
        }

        if user.password.needs_rehash() {
            self.upgrade_hash(&mut user, &raw).await;
        }

        Ok(Some(user))
    }

    /// Replace an outdated hash. Failure keeps the old hash and is not fatal.
    async fn upgrade_hash(&self, user: &mut User, raw: &RawPassword) {
        let upgraded = match UserPassword::from_raw(raw, self.config.pepper()) {
            Ok(hash) => hash,
            Err(e) => {
                tracing::warn!(user_id = %user.id, error = %e, "Password rehash failed");
                return;
            }
        };

        let previous = (user.password.clone(), user.updated_at);
        user.set_password(upgraded);

        match self.repo.update(user).await {
            Ok(()) => tracing::info!(user_id = %user.id, "Password hash upgraded"),
            Err(e) => {
                tracing::warn!(user_id = %user.id, error = %e, "Could not persist upgraded hash");
                (user.password, user.updated_at) = previous;
            }
        }
    }
}

/// Argon2id hash of a fixed throwaway password, computed once.
fn dummy_hash() -> Option<&'static UserPassword> {
    static DUMMY: OnceLock<Option<UserPassword>> = OnceLock::new();
    DUMMY
        .get_or_init(|| {
            let raw = RawPassword::new("no-such-account".to_string()).ok()?;
            UserPassword::from_raw(&raw, None).ok()
        })
        .as_ref()
}
