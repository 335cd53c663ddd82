//! API response envelope and error types
//!
//! - `ApiResponse<T>`: unified response wrapper
//! - `ApiError`: stable error kind + HTTP status + human message
//! - `error_codes`: standard error code constants

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Unified API response wrapper
///
/// All API responses follow this structure:
/// - code: 0 = success, non-zero = error code
/// - msg: short message description
/// - data: actual data (success) or absent (error)
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response code: 0 for success, non-zero for errors
    #[schema(example = 0)]
    pub code: i32,
    /// Response message
    #[schema(example = "ok")]
    pub msg: String,
    /// Response data (only present when code == 0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Create success response
    pub fn success(data: T) -> Self {
        Self {
            code: 0,
            msg: "ok".to_string(),
            data: Some(data),
        }
    }

    /// Create error response
    pub fn error(code: i32, msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            code,
            msg: msg.into(),
            data: None,
        }
    }
}

/// Standard API error codes
pub mod error_codes {
    // Success
    pub const SUCCESS: i32 = 0;

    // Client errors (1xxx)
    pub const VALIDATION_FAILED: i32 = 1001;

    // Auth errors (2xxx)
    pub const MISSING_AUTH: i32 = 2001;
    pub const AUTH_FAILED: i32 = 2002;

    // Resource errors (3xxx/4xxx)
    pub const CONFLICT: i32 = 3001;
    pub const NOT_FOUND: i32 = 4001;

    // Server errors (5xxx)
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const SERVICE_UNAVAILABLE: i32 = 5001;
}

/// API error carrying a stable code, an HTTP status, and a human-readable
/// message. Converts into the `ApiResponse` envelope on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: i32,
    pub message: String,
}

impl ApiError {
    fn new(status: StatusCode, code: i32, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// Field constraint violation (name/email/age/course/city bounds,
    /// paging parameters).
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            error_codes::VALIDATION_FAILED,
            message,
        )
    }

    /// Authorization header absent entirely.
    pub fn missing_auth(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, error_codes::MISSING_AUTH, message)
    }

    /// Invalid/expired token, bad credentials, deleted identity.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, error_codes::AUTH_FAILED, message)
    }

    /// Duplicate email at registration or record creation/update.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, error_codes::CONFLICT, message)
    }

    /// Record absent or not owned by the caller.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, error_codes::NOT_FOUND, message)
    }

    /// Store failure unrelated to business rules.
    pub fn db_error(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            error_codes::INTERNAL_ERROR,
            message,
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            error_codes::INTERNAL_ERROR,
            message,
        )
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            error_codes::SERVICE_UNAVAILABLE,
            message,
        )
    }

    /// Convenience for handler `match` arms.
    pub fn into_err<T>(self) -> ApiResult<T> {
        Err(self)
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        // One line per offending field, first message each.
        let mut parts: Vec<String> = errors
            .field_errors()
            .iter()
            .map(|(field, errs)| {
                let msg = errs
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "invalid value".to_string());
                format!("{}: {}", field, msg)
            })
            .collect();
        parts.sort();
        Self::validation(parts.join("; "))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ApiResponse::<()>::error(self.code, self.message)),
        )
            .into_response()
    }
}

/// Handler result: status + enveloped body, or an `ApiError`.
pub type ApiResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

/// 200 OK with a success envelope.
pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok((StatusCode::OK, Json(ApiResponse::success(data))))
}

/// 201 Created with a success envelope.
pub fn created<T>(data: T) -> ApiResult<T> {
    Ok((StatusCode::CREATED, Json(ApiResponse::success(data))))
}

/// Human-readable outcome of an operation with no payload of its own.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Student deleted successfully")]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_constructors_map_status_and_code() {
        assert_eq!(
            ApiError::validation("x").status,
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(ApiError::validation("x").code, error_codes::VALIDATION_FAILED);
        assert_eq!(ApiError::missing_auth("x").status, StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::missing_auth("x").code, error_codes::MISSING_AUTH);
        assert_eq!(ApiError::unauthorized("x").status, StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::unauthorized("x").code, error_codes::AUTH_FAILED);
        assert_eq!(ApiError::conflict("x").status, StatusCode::CONFLICT);
        assert_eq!(ApiError::not_found("x").status, StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::db_error("x").status,
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::service_unavailable("x").status,
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn success_envelope_has_code_zero() {
        let resp = ApiResponse::success(5);
        assert_eq!(resp.code, error_codes::SUCCESS);
        assert_eq!(resp.data, Some(5));
    }

    #[test]
    fn error_envelope_carries_message() {
        let resp = ApiResponse::<()>::error(error_codes::NOT_FOUND, "Student not found");
        assert_eq!(resp.code, 4001);
        assert_eq!(resp.msg, "Student not found");
        assert!(resp.data.is_none());
    }
}
