//! Authorization Gate
//!
//! `require_bearer` guards routes that need a signed-in user. On success the
//! resolved `AuthenticatedIdentity` is stored in request extensions and read
//! by handlers through the `CurrentUser` extractor.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use platform::bearer::extract_bearer_token;
use std::sync::Arc;

use crate::application::authorize::{AuthenticatedIdentity, AuthorizeUseCase};
use crate::application::token::TokenValidator;
use crate::domain::repository::UserRepository;
use crate::error::AuthError;

/// Middleware state
pub struct GateState<R>
where
    R: UserRepository + Send + Sync + 'static,
{
    repo: Arc<R>,
    validator: Arc<TokenValidator>,
}

impl<R> GateState<R>
where
    R: UserRepository + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>, validator: Arc<TokenValidator>) -> Self {
        Self { repo, validator }
    }
}

impl<R> Clone for GateState<R>
where
    R: UserRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            validator: self.validator.clone(),
        }
    }
}

/// Middleware that requires `Authorization: Bearer <token>` for a live user.
///
/// Every rejection is the same 401 with `WWW-Authenticate: Bearer`.
pub async fn require_bearer<R>(
    State(state): State<GateState<R>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError>
where
    R: UserRepository + Send + Sync + 'static,
{
    let Some(token) = extract_bearer_token(req.headers()) else {
        tracing::debug!("Missing or malformed Authorization header");
        return Err(AuthError::InvalidToken);
    };

    let identity = AuthorizeUseCase::new(state.repo.clone(), state.validator.clone())
        .execute(&token)
        .await?;

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

/// Extractor for the identity established by `require_bearer`.
///
/// Rejects with 401 when used on a route the gate does not cover.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthenticatedIdentity);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedIdentity>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| {
                tracing::warn!("CurrentUser used on a route without the authorization gate");
                AuthError::InvalidToken
            })
    }
}
