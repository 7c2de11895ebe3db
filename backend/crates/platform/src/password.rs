//! Password Hashing and Verification
//!
//! - Argon2id hashing with a random per-password salt (PHC string output)
//! - Optional application-wide pepper
//! - Zeroization of clear text and peppered buffers
//! - Verification of legacy unsalted SHA-256 hex digests, so accounts
//!   created by the previous backend can still sign in and be upgraded
//!
//! Mismatch is never an error: `verify` answers `false`.

use std::fmt;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::crypto::{constant_time_eq, sha256_hex};

/// Maximum password length in Unicode code points
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Length of a legacy SHA-256 hex digest
const LEGACY_DIGEST_LEN: usize = 64;

// ============================================================================
// Errors
// ============================================================================

/// Password policy violation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("Password contains invalid control characters")]
    InvalidCharacter,
}

/// Hashing / stored-hash errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Clear Text Password
// ============================================================================

/// Clear text password, zeroized on drop and redacted in `Debug`.
///
/// Deliberately not `Clone`.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Validate user input.
    ///
    /// Rejects empty/whitespace-only input, more than
    /// [`MAX_PASSWORD_LENGTH`] characters and control characters other than
    /// space, tab and newline. There is no minimum length beyond non-empty.
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let password = Self(raw);

        if password.0.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        let char_count = password.0.chars().count();
        if char_count > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if password
            .0
            .chars()
            .any(|ch| ch.is_control() && ch != '\t' && ch != '\n')
        {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        Ok(password)
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    fn peppered(&self, pepper: Option<&[u8]>) -> Zeroizing<Vec<u8>> {
        let mut bytes = Zeroizing::new(self.as_bytes().to_vec());
        if let Some(p) = pepper {
            bytes.extend_from_slice(p);
        }
        bytes
    }

    /// Hash with Argon2id (OWASP defaults: m=19 MiB, t=2, p=1).
    pub fn hash(&self, pepper: Option<&[u8]>) -> Result<HashedPassword, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(&self.peppered(pepper), &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(HashedPassword {
            encoded: hash.to_string(),
            scheme: HashScheme::Argon2,
        })
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HashScheme {
    /// PHC string produced by the `argon2` crate
    Argon2,
    /// Unsalted SHA-256, lower-case hex
    LegacySha256,
}

/// Stored password hash, safe to persist.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    encoded: String,
    scheme: HashScheme,
}

impl HashedPassword {
    /// Parse a hash loaded from storage.
    ///
    /// Accepts PHC strings and 64-character SHA-256 hex digests.
    pub fn from_stored(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let encoded = s.into();

        if is_legacy_digest(&encoded) {
            return Ok(Self {
                encoded: encoded.to_ascii_lowercase(),
                scheme: HashScheme::LegacySha256,
            });
        }

        PasswordHash::new(&encoded).map_err(|_| PasswordHashError::InvalidHashFormat)?;

        Ok(Self {
            encoded,
            scheme: HashScheme::Argon2,
        })
    }

    /// Produce a digest in the legacy format.
    ///
    /// Only for seeding fixtures and migration tooling; new accounts always
    /// get Argon2id.
    pub fn legacy_sha256(password: &ClearTextPassword) -> Self {
        Self {
            encoded: sha256_hex(password.as_bytes()),
            scheme: HashScheme::LegacySha256,
        }
    }

    /// String to persist.
    pub fn as_str(&self) -> &str {
        &self.encoded
    }

    /// True for digests created by the previous backend.
    pub fn is_legacy(&self) -> bool {
        self.scheme == HashScheme::LegacySha256
    }

    /// Verify a password. Mismatch and unusable hashes both return `false`.
    ///
    /// The pepper is ignored for legacy digests; they were never peppered.
    pub fn verify(&self, password: &ClearTextPassword, pepper: Option<&[u8]>) -> bool {
        match self.scheme {
            HashScheme::LegacySha256 => {
                let candidate = sha256_hex(password.as_bytes());
                constant_time_eq(candidate.as_bytes(), self.encoded.as_bytes())
            }
            HashScheme::Argon2 => {
                let Ok(parsed) = PasswordHash::new(&self.encoded) else {
                    return false;
                };
                Argon2::default()
                    .verify_password(&password.peppered(pepper), &parsed)
                    .is_ok()
            }
        }
    }

    /// True when the hash should be replaced on the next successful login.
    pub fn needs_rehash(&self) -> bool {
        match self.scheme {
            HashScheme::LegacySha256 => true,
            HashScheme::Argon2 => match PasswordHash::new(&self.encoded) {
                Ok(parsed) => parsed.algorithm != argon2::Algorithm::Argon2id.ident(),
                Err(_) => true,
            },
        }
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("scheme", &self.scheme)
            .field("hash", &"[HASH]")
            .finish()
    }
}

fn is_legacy_digest(s: &str) -> bool {
    s.len() == LEGACY_DIGEST_LEN && s.bytes().all(|b| b.is_ascii_hexdigit())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn password(s: &str) -> ClearTextPassword {
        ClearTextPassword::new(s.to_string()).unwrap()
    }

    #[test]
    fn test_policy() {
        assert!(ClearTextPassword::new("pw".to_string()).is_ok());
        assert_eq!(
            ClearTextPassword::new("".to_string()).unwrap_err(),
            PasswordPolicyError::EmptyOrWhitespace
        );
        assert_eq!(
            ClearTextPassword::new("   ".to_string()).unwrap_err(),
            PasswordPolicyError::EmptyOrWhitespace
        );
        assert_eq!(
            ClearTextPassword::new("a".repeat(MAX_PASSWORD_LENGTH + 1)).unwrap_err(),
            PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: MAX_PASSWORD_LENGTH + 1
            }
        );
        assert!(ClearTextPassword::new("a".repeat(MAX_PASSWORD_LENGTH)).is_ok());
        assert_eq!(
            ClearTextPassword::new("bad\u{0007}bell".to_string()).unwrap_err(),
            PasswordPolicyError::InvalidCharacter
        );
    }

    #[test]
    fn test_hash_and_verify() {
        let pw = password("correct horse");
        let hashed = pw.hash(None).unwrap();

        assert!(hashed.verify(&pw, None));
        assert!(!hashed.verify(&password("wrong horse"), None));
        assert!(!hashed.is_legacy());
        assert!(!hashed.needs_rehash());
    }

    #[test]
    fn test_distinct_passwords_distinct_hashes() {
        let a = password("alpha").hash(None).unwrap();
        let b = password("beta").hash(None).unwrap();
        assert_ne!(a.as_str(), b.as_str());
    }

    #[test]
    fn test_hash_is_salted() {
        let pw = password("same input");
        let a = pw.hash(None).unwrap();
        let b = pw.hash(None).unwrap();
        assert_ne!(a.as_str(), b.as_str());
        assert!(a.verify(&pw, None));
        assert!(b.verify(&pw, None));
    }

    #[test]
    fn test_pepper() {
        let pw = password("peppered");
        let pepper = b"app-pepper";
        let hashed = pw.hash(Some(pepper)).unwrap();

        assert!(hashed.verify(&pw, Some(pepper)));
        assert!(!hashed.verify(&pw, None));
        assert!(!hashed.verify(&pw, Some(b"other")));
    }

    #[test]
    fn test_stored_roundtrip() {
        let pw = password("stored");
        let hashed = pw.hash(None).unwrap();
        let restored = HashedPassword::from_stored(hashed.as_str().to_string()).unwrap();
        assert!(restored.verify(&pw, None));
    }

    #[test]
    fn test_legacy_digest() {
        // sha256("pw") as written by the previous backend
        let stored = "30c952fab122c3f9759f02a6d95c3758b246b4fee239957b2d4fee46e26170c4";
        let hashed = HashedPassword::from_stored(stored).unwrap();

        assert!(hashed.is_legacy());
        assert!(hashed.needs_rehash());
        assert!(hashed.verify(&password("pw"), None));
        assert!(hashed.verify(&password("pw"), Some(b"pepper is ignored")));
        assert!(!hashed.verify(&password("pw2"), None));
        assert_eq!(HashedPassword::legacy_sha256(&password("pw")), hashed);
    }

    #[test]
    fn test_legacy_digest_uppercase_accepted() {
        let stored = "30C952FAB122C3F9759F02A6D95C3758B246B4FEE239957B2D4FEE46E26170C4";
        let hashed = HashedPassword::from_stored(stored).unwrap();
        assert!(hashed.verify(&password("pw"), None));
    }

    #[test]
    fn test_invalid_stored_hash() {
        assert!(HashedPassword::from_stored("not_a_valid_hash").is_err());
        assert!(HashedPassword::from_stored("").is_err());
    }

    #[test]
    fn test_debug_redaction() {
        let pw = password("secret-value");
        let debug_output = format!("{:?}", pw);
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("secret-value"));

        let hashed = pw.hash(None).unwrap();
        assert!(!format!("{:?}", hashed).contains(hashed.as_str()));
    }
}
