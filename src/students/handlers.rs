//! Student HTTP handlers
//!
//! All routes here sit behind the auth middleware; the injected
//! [`CurrentUser`] supplies the owner id for every store operation.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use std::sync::Arc;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::db::is_unique_violation;
use crate::gateway::state::AppState;
use crate::gateway::types::{ApiError, ApiResponse, ApiResult, MessageResponse, created, ok};

use super::models::{NewStudent, Student, StudentPatch};
use super::query::{DistinctField, ListParams, ListQuery, StudentPage, StudentQuery};
use super::repository::StudentRepository;

/// Create a new student record
///
/// POST /api/v1/students
#[utoipa::path(
    post,
    path = "/api/v1/students",
    request_body = NewStudent,
    responses(
        (status = 201, description = "Student created", body = ApiResponse<Student>),
        (status = 409, description = "A student with this email already exists"),
        (status = 422, description = "Field constraint violation"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
pub async fn create_student(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<NewStudent>,
) -> ApiResult<Student> {
    payload.validate()?;

    let taken = StudentRepository::email_taken(state.db.pool(), &payload.email, None)
        .await
        .map_err(|e| ApiError::db_error(format!("Email check failed: {}", e)))?;
    if taken {
        return Err(ApiError::conflict("A student with this email already exists"));
    }

    match StudentRepository::insert(state.db.pool(), user.id, &payload).await {
        Ok(student) => {
            tracing::info!(student_id = student.id, owner_id = user.id, "student created");
            created(student)
        }
        Err(e) if is_unique_violation(&e) => {
            Err(ApiError::conflict("A student with this email already exists"))
        }
        Err(e) => Err(ApiError::db_error(format!("Student insert failed: {}", e))),
    }
}

/// Paginated list of the caller's students
///
/// GET /api/v1/students
#[utoipa::path(
    get,
    path = "/api/v1/students",
    params(
        ("page" = Option<u32>, Query, description = "Page number (default: 1)"),
        ("page_size" = Option<u32>, Query, description = "Items per page (default: 10, max: 100)"),
        ("search" = Option<String>, Query, description = "Substring match on name, email, course, or city"),
        ("course" = Option<String>, Query, description = "Filter by course (substring)"),
        ("city" = Option<String>, Query, description = "Filter by city (substring)"),
        ("sort_by" = Option<String>, Query, description = "name|email|age|course|city|created_at|updated_at"),
        ("sort_order" = Option<String>, Query, description = "asc or desc (default: desc)")
    ),
    responses(
        (status = 200, description = "One page of students", body = ApiResponse<StudentPage>),
        (status = 422, description = "Paging parameter out of range"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
pub async fn list_students(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<ListParams>,
) -> ApiResult<StudentPage> {
    let query = ListQuery::from_params(params).map_err(|e| ApiError::validation(e.to_string()))?;

    match StudentQuery::list(state.db.pool(), user.id, &query).await {
        Ok(page) => ok(page),
        Err(e) => Err(ApiError::db_error(format!("Student query failed: {}", e))),
    }
}

/// Every student the caller owns, newest first
///
/// GET /api/v1/students/all
#[utoipa::path(
    get,
    path = "/api/v1/students/all",
    responses(
        (status = 200, description = "All owned students", body = ApiResponse<Vec<Student>>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
pub async fn list_all_students(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Vec<Student>> {
    match StudentQuery::list_all(state.db.pool(), user.id).await {
        Ok(students) => ok(students),
        Err(e) => Err(ApiError::db_error(format!("Student query failed: {}", e))),
    }
}

/// Unique course names among the caller's students
///
/// GET /api/v1/students/courses
#[utoipa::path(
    get,
    path = "/api/v1/students/courses",
    responses(
        (status = 200, description = "Distinct courses", body = ApiResponse<Vec<String>>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
pub async fn list_courses(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Vec<String>> {
    match StudentQuery::distinct_values(state.db.pool(), user.id, DistinctField::Course).await {
        Ok(courses) => ok(courses),
        Err(e) => Err(ApiError::db_error(format!("Course query failed: {}", e))),
    }
}

/// Unique city names among the caller's students
///
/// GET /api/v1/students/cities
#[utoipa::path(
    get,
    path = "/api/v1/students/cities",
    responses(
        (status = 200, description = "Distinct cities", body = ApiResponse<Vec<String>>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
pub async fn list_cities(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Vec<String>> {
    match StudentQuery::distinct_values(state.db.pool(), user.id, DistinctField::City).await {
        Ok(cities) => ok(cities),
        Err(e) => Err(ApiError::db_error(format!("City query failed: {}", e))),
    }
}

/// Fetch one student by id
///
/// GET /api/v1/students/{student_id}
#[utoipa::path(
    get,
    path = "/api/v1/students/{student_id}",
    params(("student_id" = i64, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student details", body = ApiResponse<Student>),
        (status = 404, description = "Student not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
pub async fn get_student(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(student_id): Path<i64>,
) -> ApiResult<Student> {
    match StudentRepository::get_owned(state.db.pool(), student_id, user.id).await {
        Ok(Some(student)) => ok(student),
        Ok(None) => ApiError::not_found("Student not found").into_err(),
        Err(e) => Err(ApiError::db_error(format!("Student lookup failed: {}", e))),
    }
}

/// Partially update a student record
///
/// PUT /api/v1/students/{student_id}
#[utoipa::path(
    put,
    path = "/api/v1/students/{student_id}",
    params(("student_id" = i64, Path, description = "Student ID")),
    request_body = StudentPatch,
    responses(
        (status = 200, description = "Updated student", body = ApiResponse<Student>),
        (status = 404, description = "Student not found"),
        (status = 409, description = "A student with this email already exists"),
        (status = 422, description = "Field constraint violation"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
pub async fn update_student(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(student_id): Path<i64>,
    Json(patch): Json<StudentPatch>,
) -> ApiResult<Student> {
    patch.validate()?;

    let current = StudentRepository::get_owned(state.db.pool(), student_id, user.id)
        .await
        .map_err(|e| ApiError::db_error(format!("Student lookup failed: {}", e)))?
        .ok_or_else(|| ApiError::not_found("Student not found"))?;

    // Nothing supplied: nothing to apply, updated_at stays put.
    if patch.is_empty() {
        return ok(current);
    }

    // Email changes re-check uniqueness against every record, not just the
    // caller's, excluding the row being updated.
    if let Some(ref email) = patch.email {
        if *email != current.email {
            let taken = StudentRepository::email_taken(state.db.pool(), email, Some(student_id))
                .await
                .map_err(|e| ApiError::db_error(format!("Email check failed: {}", e)))?;
            if taken {
                return Err(ApiError::conflict("A student with this email already exists"));
            }
        }
    }

    match StudentRepository::update(state.db.pool(), &current, &patch).await {
        Ok(student) => ok(student),
        Err(e) if is_unique_violation(&e) => {
            Err(ApiError::conflict("A student with this email already exists"))
        }
        Err(e) => Err(ApiError::db_error(format!("Student update failed: {}", e))),
    }
}

/// Delete a student record
///
/// DELETE /api/v1/students/{student_id}
#[utoipa::path(
    delete,
    path = "/api/v1/students/{student_id}",
    params(("student_id" = i64, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student deleted", body = ApiResponse<MessageResponse>),
        (status = 404, description = "Student not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
pub async fn delete_student(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(student_id): Path<i64>,
) -> ApiResult<MessageResponse> {
    let student = StudentRepository::get_owned(state.db.pool(), student_id, user.id)
        .await
        .map_err(|e| ApiError::db_error(format!("Student lookup failed: {}", e)))?
        .ok_or_else(|| ApiError::not_found("Student not found"))?;

    let deleted = StudentRepository::delete_owned(state.db.pool(), student_id, user.id)
        .await
        .map_err(|e| ApiError::db_error(format!("Student delete failed: {}", e)))?;
    if !deleted {
        return Err(ApiError::not_found("Student not found"));
    }

    tracing::info!(student_id, owner_id = user.id, "student deleted");
    ok(MessageResponse {
        message: "Student deleted successfully".to_string(),
        detail: Some(format!("Student '{}' has been removed", student.name)),
    })
}
