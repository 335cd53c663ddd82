//! Administrative maintenance endpoints
//!
//! Not part of the auth/query core: the gate is a plain comparison of the
//! `X-Admin-Secret` header against the configured signing secret, matching
//! how the maintenance tooling authenticates out-of-band.

use axum::{
    extract::State,
    http::{HeaderMap, HeaderName},
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::gateway::state::AppState;
use crate::gateway::types::{ApiError, ApiResponse, ApiResult, ok};

static ADMIN_SECRET_HEADER: HeaderName = HeaderName::from_static("x-admin-secret");

#[derive(Debug, Serialize, ToSchema)]
pub struct ClearDbResponse {
    #[schema(example = "ok")]
    pub status: &'static str,
    #[schema(example = "truncate")]
    pub action: &'static str,
}

/// Clear all users and students and restart id sequences
///
/// POST /api/v1/admin/clear-db
#[utoipa::path(
    post,
    path = "/api/v1/admin/clear-db",
    responses(
        (status = 200, description = "Tables cleared", body = ApiResponse<ClearDbResponse>),
        (status = 401, description = "Invalid admin secret")
    ),
    tag = "Admin"
)]
pub async fn clear_db(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<ClearDbResponse> {
    let provided = headers
        .get(&ADMIN_SECRET_HEADER)
        .and_then(|h| h.to_str().ok());
    if provided != Some(state.admin_secret.as_str()) {
        return Err(ApiError::unauthorized("Unauthorized: invalid admin secret"));
    }

    sqlx::query("TRUNCATE TABLE students, users RESTART IDENTITY CASCADE")
        .execute(state.db.pool())
        .await
        .map_err(|e| ApiError::db_error(format!("Truncate failed: {}", e)))?;

    tracing::warn!("admin clear-db executed: users and students truncated");
    ok(ClearDbResponse {
        status: "ok",
        action: "truncate",
    })
}
