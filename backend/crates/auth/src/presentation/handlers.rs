//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, Query, State};
use std::sync::Arc;

use kernel::id::UserId;

use crate::application::config::AuthConfig;
use crate::application::token::{TokenIssuer, TokenValidator};
use crate::application::{
    CreateUserInput, ManageUsersUseCase, SignInInput, SignInUseCase, SignUpInput, SignUpUseCase,
    UpdateUserInput,
};
use crate::domain::repository::UserRepository;
use crate::error::AuthResult;
use crate::presentation::dto::{
    CreateUserRequest, LoginRequest, LoginResponse, MessageResponse, SignUpRequest,
    UpdateUserRequest, UserResponse, ValidateQuery, ValidateResponse,
};
use crate::presentation::middleware::{CurrentUser, GateState};

/// Shared state for auth and user handlers
pub struct AuthAppState<R>
where
    R: UserRepository + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
    pub issuer: Arc<TokenIssuer>,
    pub validator: Arc<TokenValidator>,
}

impl<R> AuthAppState<R>
where
    R: UserRepository + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self {
            issuer: Arc::new(TokenIssuer::new(&config)),
            validator: Arc::new(TokenValidator::new(&config)),
            repo,
            config,
        }
    }

    /// State for the authorization gate, sharing this state's keys.
    pub fn gate(&self) -> GateState<R> {
        GateState::new(self.repo.clone(), self.validator.clone())
    }
}

// Manual impl: `R` itself need not be `Clone`.
impl<R> Clone for AuthAppState<R>
where
    R: UserRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
            issuer: self.issuer.clone(),
            validator: self.validator.clone(),
        }
    }
}

// ============================================================================
// Auth
// ============================================================================

/// POST /auth/signup
pub async fn sign_up<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<SignUpRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    R: UserRepository + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(state.repo.clone(), state.config.clone());

    use_case
        .execute(SignUpInput {
            name: req.name,
            email: req.email,
            user_name: req.user_name,
            password: req.password,
        })
        .await?;

    Ok(Json(MessageResponse::new("Signup successful")))
}

/// POST /auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<Json<LoginResponse>>
where
    R: UserRepository + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(
        state.repo.clone(),
        state.config.clone(),
        state.issuer.clone(),
    );

    let output = use_case
        .execute(SignInInput {
            identifier: req.email_or_username,
            password: req.password,
        })
        .await?;

    Ok(Json(LoginResponse {
        access_token: output.access_token,
        user: output.user.into(),
    }))
}

/// GET /auth/profile (gated)
pub async fn profile(CurrentUser(identity): CurrentUser) -> Json<UserResponse> {
    Json(identity.user.into())
}

/// GET /auth/validate?token=
///
/// Diagnostic only. Never use the answer to authorize anything.
pub async fn validate<R>(
    State(state): State<AuthAppState<R>>,
    Query(query): Query<ValidateQuery>,
) -> Json<ValidateResponse>
where
    R: UserRepository + Send + Sync + 'static,
{
    Json(state.validator.check(&query.token).into())
}

// ============================================================================
// Users
// ============================================================================

/// GET /user
pub async fn list_users<R>(
    State(state): State<AuthAppState<R>>,
) -> AuthResult<Json<Vec<UserResponse>>>
where
    R: UserRepository + Send + Sync + 'static,
{
    let users = ManageUsersUseCase::new(state.repo.clone(), state.config.clone())
        .list()
        .await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// POST /user
pub async fn create_user<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<CreateUserRequest>,
) -> AuthResult<Json<UserResponse>>
where
    R: UserRepository + Send + Sync + 'static,
{
    let profile = req.profile();
    let user = ManageUsersUseCase::new(state.repo.clone(), state.config.clone())
        .create(CreateUserInput {
            name: req.name,
            email: req.email,
            user_name: req.user_name,
            password: req.password,
            profile,
        })
        .await?;

    Ok(Json(user.into()))
}

/// PUT /user/{id}
pub async fn update_user<R>(
    State(state): State<AuthAppState<R>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    R: UserRepository + Send + Sync + 'static,
{
    ManageUsersUseCase::new(state.repo.clone(), state.config.clone())
        .update(
            UserId::new(id),
            UpdateUserInput {
                name: req.name,
                email: req.email,
                user_name: req.user_name,
                password: req.password,
                dob: req.dob,
                phone: req.phone,
                address: req.address,
                city: req.city,
            },
        )
        .await?;

    Ok(Json(MessageResponse::new("User updated successfully")))
}

/// DELETE /user/{id} (gated)
pub async fn delete_user<R>(
    State(state): State<AuthAppState<R>>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<i64>,
) -> AuthResult<Json<MessageResponse>>
where
    R: UserRepository + Send + Sync + 'static,
{
    ManageUsersUseCase::new(state.repo.clone(), state.config.clone())
        .delete(UserId::new(id))
        .await?;

    tracing::info!(user_id = id, deleted_by = %identity.user.id, "User removed via API");

    Ok(Json(MessageResponse::new("User deleted successfully")))
}
