//! Bearer Token Extraction
//!
//! Parses `Authorization: Bearer <token>` (RFC 6750). The scheme is matched
//! case-insensitively; anything else yields `None`.

use axum::http::{HeaderMap, HeaderValue, header};

/// Scheme name, also used for the `WWW-Authenticate` challenge.
pub const BEARER_SCHEME: &str = "Bearer";

/// Extract the bearer token from request headers.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_bearer)
        .map(str::to_owned)
}

/// Parse a raw `Authorization` header value.
pub fn parse_bearer(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return None;
    }
    let token = token.trim();
    if token.is_empty() || token.contains(char::is_whitespace) {
        return None;
    }
    Some(token)
}

/// `WWW-Authenticate` value sent with 401 responses.
pub fn challenge() -> HeaderValue {
    HeaderValue::from_static(BEARER_SCHEME)
}
