//! User Name Value Object
//!
//! Public handle usable as a login identifier next to the email.
//!
//! Allowed: ASCII letters, digits and `_ . - +`, 1 to 64 characters. Case
//! is preserved and matched exactly. `@` is never allowed, so a user name
//! cannot be mistaken for an email address.

use derive_more::Display;
use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

pub const USER_NAME_MAX_LENGTH: usize = 64;

const ALLOWED_SPECIAL_CHARS: &[char] = &['_', '.', '-', '+'];

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub struct UserName(String);

impl UserName {
    pub fn new(user_name: impl Into<String>) -> AppResult<Self> {
        let user_name = user_name.into().trim().to_string();

        if user_name.is_empty() {
            return Err(AppError::bad_request("User name cannot be empty"));
        }

        if user_name.chars().count() > USER_NAME_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "User name must be at most {} characters",
                USER_NAME_MAX_LENGTH
            )));
        }

        if let Some(bad) = user_name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || ALLOWED_SPECIAL_CHARS.contains(c)))
        {
            return Err(AppError::bad_request(format!(
                "User name contains an invalid character: {:?}",
                bad
            ))
            .with_action("Use letters, digits and _ . - + only"));
        }

        Ok(Self(user_name))
    }

    pub fn from_db(user_name: impl Into<String>) -> Self {
        Self(user_name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
