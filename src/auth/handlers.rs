//! Auth HTTP handlers
//!
//! POST /api/v1/auth/register, POST /api/v1/auth/login,
//! GET /api/v1/auth/me, GET /api/v1/auth/verify

use axum::{Extension, Json, extract::State};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

use crate::gateway::state::AppState;
use crate::gateway::types::{ApiResponse, ApiResult, created, ok};
use crate::identity::UserProfile;

use super::middleware::CurrentUser;
use super::service::{AuthResponse, LoginRequest, RegisterRequest};

/// Register a new user account
///
/// POST /api/v1/auth/register
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = ApiResponse<UserProfile>),
        (status = 409, description = "Email already registered"),
        (status = 422, description = "Field constraint violation")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<UserProfile> {
    req.validate()?;

    let user = state.auth.register(req).await?;
    created(UserProfile::from(user))
}

/// Authenticate and obtain a bearer token
///
/// POST /api/v1/auth/login
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<AuthResponse>),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<AuthResponse> {
    match state.auth.login(req).await {
        Ok(resp) => ok(resp),
        Err(e) => {
            tracing::warn!("login failed: {}", e.message);
            Err(e)
        }
    }
}

/// Current authenticated user's profile
///
/// GET /api/v1/auth/me
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Current profile", body = ApiResponse<UserProfile>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn me(Extension(user): Extension<CurrentUser>) -> ApiResult<UserProfile> {
    ok(UserProfile {
        id: user.id,
        email: user.email,
        name: user.name,
        created_at: user.created_at,
    })
}

/// Token verification response
#[derive(Debug, Serialize, ToSchema)]
pub struct VerifyResponse {
    pub valid: bool,
    pub user_id: i64,
    pub email: String,
    pub name: String,
}

/// Check that the presented token maps to a live identity
///
/// GET /api/v1/auth/verify
#[utoipa::path(
    get,
    path = "/api/v1/auth/verify",
    responses(
        (status = 200, description = "Token valid", body = ApiResponse<VerifyResponse>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn verify(Extension(user): Extension<CurrentUser>) -> ApiResult<VerifyResponse> {
    ok(VerifyResponse {
        valid: true,
        user_id: user.id,
        email: user.email,
        name: user.name,
    })
}
