//! Request authentication middleware

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::gateway::state::AppState;
use crate::gateway::types::ApiError;
use crate::identity::User;

/// The verified caller, injected as a request extension for protected
/// routes. Carries no password hash.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            created_at: user.created_at,
        }
    }
}

/// Resolve the bearer token on every request and inject the caller.
///
/// The identity row is re-fetched per call, so tokens for deleted accounts
/// stop working the moment the row is gone.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let raw_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let user = state.auth.resolve(raw_header).await?;
    request.extensions_mut().insert(CurrentUser::from(user));

    Ok(next.run(request).await)
}
