//! System handlers: service banner and health check

use axum::{Json, extract::State};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use utoipa::ToSchema;

use super::state::AppState;
use super::types::{ApiError, ApiResponse, ApiResult, ok};

/// Service banner with version and endpoint map
///
/// GET /
pub async fn service_info() -> Json<Value> {
    Json(json!({
        "service": "roster",
        "version": env!("CARGO_PKG_VERSION"),
        "build": env!("GIT_HASH"),
        "docs": "/docs",
        "endpoints": {
            "auth": "/api/v1/auth",
            "students": "/api/v1/students"
        }
    }))
}

/// Health check response data
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: &'static str,
    /// Server timestamp in milliseconds
    #[schema(example = 1703494800000_u64)]
    pub timestamp_ms: u64,
}

/// Health check endpoint
///
/// GET /health — pings the database; a store failure reports 503 without
/// exposing internal detail.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service healthy", body = ApiResponse<HealthResponse>),
        (status = 503, description = "Service unavailable")
    ),
    tag = "System"
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> ApiResult<HealthResponse> {
    if let Err(e) = state.db.health_check().await {
        tracing::error!("health check failed: {}", e);
        return Err(ApiError::service_unavailable("unavailable"));
    }

    let timestamp_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    ok(HealthResponse {
        status: "healthy",
        timestamp_ms,
    })
}
