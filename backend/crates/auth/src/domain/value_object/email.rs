//! Email Value Object
//!
//! Stored trimmed and lower-cased, so uniqueness and login lookups are
//! case-insensitive. Delivery is never verified.

use derive_more::Display;
use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const MAX_LEN: usize = 254;
const MAX_LOCAL_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub struct Email(String);

impl Email {
    pub fn new(email: impl Into<String>) -> AppResult<Self> {
        let email = Self::normalize_lookup(&email.into());

        match email.len() {
            0 => Err(AppError::bad_request("Email cannot be empty")),
            n if n > MAX_LEN => Err(AppError::bad_request(format!(
                "Email must be at most {MAX_LEN} characters"
            ))),
            _ if !looks_like_address(&email) => Err(AppError::bad_request("Invalid email format")
                .with_action("Please enter a valid email address")),
            _ => Ok(Self(email)),
        }
    }

    /// Wrap a value read from the database (already validated on write)
    pub fn from_db(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Normalise a login identifier the same way stored emails are.
    pub fn normalize_lookup(identifier: &str) -> String {
        identifier.trim().to_lowercase()
    }
}

/// `local@domain` where the domain has at least two dot-separated labels of
/// ASCII letters, digits and inner hyphens.
fn looks_like_address(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    let local_ok = !local.is_empty()
        && local.len() <= MAX_LOCAL_LEN
        && !local.chars().any(char::is_whitespace);

    let labels: Vec<&str> = domain.split('.').collect();
    let domain_ok = labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        });

    local_ok && domain_ok
}

impl FromStr for Email {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        Email::new(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
