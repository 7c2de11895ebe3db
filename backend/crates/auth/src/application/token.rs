//! Access Tokens
//!
//! Stateless HS256 JWTs. The payload always carries `sub` (user id as a
//! decimal string), `iat` and `exp` (seconds since epoch). Extra claims are
//! informational; only `sub` is ever used to make an authorization decision.
//!
//! Lifecycle: a token is valid while `now < exp` and expired from `exp` on.
//! There is no revocation.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use kernel::id::UserId;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::application::config::AuthConfig;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Claims the issuer controls; callers cannot override them via extras.
const RESERVED_CLAIMS: &[&str] = &["sub", "iat", "exp"];

#[derive(Debug, Error)]
pub enum TokenError {
    /// Bad signature, expired, or unparseable. Deliberately one variant.
    #[error("Invalid token")]
    Invalid,

    #[error("Token signing failed: {0}")]
    Signing(String),
}

/// Decoded token payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(deserialize_with = "string_or_number")]
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    pub exp: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    /// The authoritative user id, if `sub` is a valid id.
    pub fn subject(&self) -> Option<UserId> {
        self.sub.parse().ok()
    }
}

// Tokens minted by the previous backend carry a numeric `sub`.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number for sub, got {other}"
        ))),
    }
}

// ============================================================================
// Issuer
// ============================================================================

/// Creates signed access tokens.
pub struct TokenIssuer {
    key: EncodingKey,
    header: Header,
    default_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            key: EncodingKey::from_secret(&config.jwt_secret),
            header: Header::new(ALGORITHM),
            default_ttl: config.token_ttl,
        }
    }

    /// Issue a token for `subject`. `ttl` falls back to the configured default.
    pub fn issue(
        &self,
        subject: UserId,
        claims: Map<String, Value>,
        ttl: Option<Duration>,
    ) -> Result<String, TokenError> {
        self.issue_at(subject, claims, ttl, Utc::now().timestamp())
    }

    /// Issue as if the current time were `now` (seconds since epoch).
    pub fn issue_at(
        &self,
        subject: UserId,
        mut claims: Map<String, Value>,
        ttl: Option<Duration>,
        now: i64,
    ) -> Result<String, TokenError> {
        let ttl_secs = i64::try_from(ttl.unwrap_or(self.default_ttl).as_secs()).unwrap_or(i64::MAX);

        claims.retain(|key, _| !RESERVED_CLAIMS.contains(&key.as_str()));

        let payload = Claims {
            sub: subject.to_string(),
            iat: Some(now),
            exp: now.saturating_add(ttl_secs),
            extra: claims,
        };

        encode(&self.header, &payload, &self.key).map_err(|e| TokenError::Signing(e.to_string()))
    }
}

// ============================================================================
// Validator
// ============================================================================

/// Result of the non-strict diagnostic check
#[derive(Debug, Clone, Serialize)]
pub struct TokenCheck {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claims: Option<Claims>,
}

/// Verifies signature and expiry, and decodes claims.
pub struct TokenValidator {
    key: DecodingKey,
    validation: Validation,
}

impl TokenValidator {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        // Expiry is checked below against an explicit clock with zero leeway.
        validation.validate_exp = false;
        validation.leeway = 0;
        // `sub` may be a string or a number; serde enforces its presence.
        validation.set_required_spec_claims(&["exp"]);

        Self {
            key: DecodingKey::from_secret(&config.jwt_secret),
            validation,
        }
    }

    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        self.validate_at(token, Utc::now().timestamp())
    }

    /// Validate as if the current time were `now` (seconds since epoch).
    pub fn validate_at(&self, token: &str, now: i64) -> Result<Claims, TokenError> {
        let claims = decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token rejected");
                TokenError::Invalid
            })?
            .claims;

        if claims.exp <= now {
            tracing::debug!(exp = claims.exp, now, "Token expired");
            return Err(TokenError::Invalid);
        }

        Ok(claims)
    }

    /// Non-throwing variant for diagnostics. Never use it to authorize.
    pub fn check(&self, token: &str) -> TokenCheck {
        match self.validate(token) {
            Ok(claims) => TokenCheck {
                valid: true,
                claims: Some(claims),
            },
            Err(_) => TokenCheck {
                valid: false,
                claims: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> AuthConfig {
        AuthConfig::new("test-secret")
    }

    fn pair() -> (TokenIssuer, TokenValidator) {
        let config = config();
        (TokenIssuer::new(&config), TokenValidator::new(&config))
    }

    #[test]
    fn test_issue_then_validate() {
        let (issuer, validator) = pair();
        let token = issuer.issue(UserId::new(42), Map::new(), None).unwrap();

        assert_eq!(token.split('.').count(), 3);
        let claims = validator.validate(&token).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.subject(), Some(UserId::new(42)));
    }

    #[test]
    fn test_default_ttl_is_24_hours() {
        let (issuer, validator) = pair();
        let now = Utc::now().timestamp();
        let token = issuer.issue_at(UserId::new(1), Map::new(), None, now).unwrap();

        let claims = validator.validate_at(&token, now).unwrap();
        assert_eq!(claims.iat, Some(now));
        assert_eq!(claims.exp, now + 86_400);
    }

    #[test]
    fn test_zero_ttl_is_invalid() {
        let (issuer, validator) = pair();
        let token = issuer
            .issue(UserId::new(1), Map::new(), Some(Duration::ZERO))
            .unwrap();
        assert!(matches!(validator.validate(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_expiry_boundary() {
        let (issuer, validator) = pair();
        let now = 1_700_000_000;
        let token = issuer
            .issue_at(UserId::new(1), Map::new(), Some(Duration::from_secs(60)), now)
            .unwrap();

        assert!(validator.validate_at(&token, now + 59).is_ok());
        assert!(validator.validate_at(&token, now + 60).is_err());
        assert!(validator.validate_at(&token, now + 3600).is_err());
    }

    #[test]
    fn test_tampered_payload_is_invalid() {
        let (issuer, validator) = pair();
        let token = issuer.issue(UserId::new(42), Map::new(), None).unwrap();

        let mut parts: Vec<String> = token.split('.').map(str::to_owned).collect();
        let payload = &mut parts[1];
        let mid = payload.len() / 2;
        let replacement = if &payload[mid..mid + 1] == "A" { "B" } else { "A" };
        payload.replace_range(mid..mid + 1, replacement);
        let tampered = parts.join(".");

        assert_ne!(tampered, token);
        assert!(matches!(validator.validate(&tampered), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let issuer = TokenIssuer::new(&AuthConfig::new("other-secret"));
        let (_, validator) = pair();
        let token = issuer.issue(UserId::new(42), Map::new(), None).unwrap();
        assert!(validator.validate(&token).is_err());
    }

    #[test]
    fn test_other_algorithm_is_invalid() {
        let (_, validator) = pair();
        let claims = json!({ "sub": "42", "exp": Utc::now().timestamp() + 600 });
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();
        assert!(validator.validate(&token).is_err());
    }

    #[test]
    fn test_garbage_is_invalid() {
        let (_, validator) = pair();
        assert!(validator.validate("").is_err());
        assert!(validator.validate("not-a-token").is_err());
        assert!(validator.validate("a.b.c").is_err());
    }

    #[test]
    fn test_missing_sub_is_invalid() {
        let (_, validator) = pair();
        let claims = json!({ "exp": Utc::now().timestamp() + 600 });
        let token = encode(
            &Header::new(ALGORITHM),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();
        assert!(validator.validate(&token).is_err());
    }

    #[test]
    fn test_numeric_sub_is_accepted() {
        let (_, validator) = pair();
        let claims = json!({ "sub": 7, "email": "a@x.com", "exp": Utc::now().timestamp() + 600 });
        let token = encode(
            &Header::new(ALGORITHM),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        let decoded = validator.validate(&token).unwrap();
        assert_eq!(decoded.subject(), Some(UserId::new(7)));
        assert_eq!(decoded.iat, None);
    }

    #[test]
    fn test_extra_claims_cannot_override_reserved() {
        let (issuer, validator) = pair();
        let mut extra = Map::new();
        extra.insert("email".into(), json!("a@x.com"));
        extra.insert("sub".into(), json!("999"));
        extra.insert("exp".into(), json!(i64::MAX));

        let token = issuer.issue(UserId::new(42), extra, None).unwrap();
        let claims = validator.validate(&token).unwrap();

        assert_eq!(claims.sub, "42");
        assert!(claims.exp < i64::MAX);
        assert_eq!(claims.extra.get("email"), Some(&json!("a@x.com")));
    }

    #[test]
    fn test_non_numeric_subject() {
        let claims = Claims {
            sub: "abc".into(),
            iat: None,
            exp: 0,
            extra: Map::new(),
        };
        assert_eq!(claims.subject(), None);
    }

    #[test]
    fn test_check_is_non_throwing() {
        let (issuer, validator) = pair();
        let token = issuer.issue(UserId::new(3), Map::new(), None).unwrap();

        let ok = validator.check(&token);
        assert!(ok.valid);
        assert_eq!(ok.claims.unwrap().sub, "3");

        let bad = validator.check("broken");
        assert!(!bad.valid);
        assert!(bad.claims.is_none());
    }
}
