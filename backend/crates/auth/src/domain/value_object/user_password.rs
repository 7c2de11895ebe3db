//! User Password Value Objects
//!
//! `RawPassword` is what the user typed; `UserPassword` is what gets stored.
//! Cryptography is delegated to `platform::password`.

use platform::password::{
    ClearTextPassword, HashedPassword, PasswordHashError, PasswordPolicyError,
};
use std::fmt;

/// Password from user input. Zeroized on drop.
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        ClearTextPassword::new(raw).map(Self)
    }

    pub(crate) fn inner(&self) -> &ClearTextPassword {
        &self.0
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

/// Stored password hash (Argon2id PHC string, or a legacy SHA-256 digest).
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    pub fn from_raw(raw: &RawPassword, pepper: Option<&[u8]>) -> Result<Self, PasswordHashError> {
        raw.inner().hash(pepper).map(Self)
    }

    pub fn from_db(stored: impl Into<String>) -> Result<Self, PasswordHashError> {
        HashedPassword::from_stored(stored).map(Self)
    }

    /// Hash in the previous backend's format. Fixtures and migrations only.
    pub fn legacy_from_raw(raw: &RawPassword) -> Self {
        Self(HashedPassword::legacy_sha256(raw.inner()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.0.verify(raw.inner(), pepper)
    }

    pub fn is_legacy(&self) -> bool {
        self.0.is_legacy()
    }

    pub fn needs_rehash(&self) -> bool {
        self.0.needs_rehash()
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let raw = RawPassword::new("pw".to_string()).unwrap();
        let hashed = UserPassword::from_raw(&raw, None).unwrap();

        assert!(hashed.verify(&raw, None));
        let wrong = RawPassword::new("wrong".to_string()).unwrap();
        assert!(!hashed.verify(&wrong, None));
    }

    #[test]
    fn test_db_roundtrip() {
        let raw = RawPassword::new("roundtrip".to_string()).unwrap();
        let hashed = UserPassword::from_raw(&raw, None).unwrap();
        let restored = UserPassword::from_db(hashed.as_str().to_string()).unwrap();
        assert!(restored.verify(&raw, None));
        assert!(UserPassword::from_db("garbage").is_err());
    }

    #[test]
    fn test_legacy_needs_rehash() {
        let raw = RawPassword::new("pw".to_string()).unwrap();
        let legacy = UserPassword::legacy_from_raw(&raw);
        assert!(legacy.is_legacy());
        assert!(legacy.needs_rehash());
        assert!(legacy.verify(&raw, None));
    }

    #[test]
    fn test_debug_redaction() {
        let raw = RawPassword::new("SecretPassword".to_string()).unwrap();
        assert!(!format!("{:?}", raw).contains("Secret"));
        let hashed = UserPassword::from_raw(&raw, None).unwrap();
        assert!(format!("{:?}", hashed).contains("[HASH]"));
    }
}
