//! OpenAPI / Swagger UI documentation
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::admin::ClearDbResponse;
use crate::auth::handlers::VerifyResponse;
use crate::auth::service::{AuthResponse, LoginRequest, RegisterRequest};
use crate::gateway::handlers::HealthResponse;
use crate::gateway::types::MessageResponse;
use crate::identity::UserProfile;
use crate::students::models::{NewStudent, Student, StudentPatch};
use crate::students::query::StudentPage;

/// Bearer JWT security scheme
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "JWT obtained from POST /api/v1/auth/login, sent as \
                             `Authorization: Bearer <token>`",
                        ))
                        .build(),
                ),
            );
        }
    }
}

/// Main API documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Roster API",
        version = "1.0.0",
        description = "Multi-tenant student roster API: each registered user manages a \
                       private set of student records with search, filtering, sorting, \
                       and pagination.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health_check,
        crate::auth::handlers::register,
        crate::auth::handlers::login,
        crate::auth::handlers::me,
        crate::auth::handlers::verify,
        crate::students::handlers::create_student,
        crate::students::handlers::list_students,
        crate::students::handlers::list_all_students,
        crate::students::handlers::list_courses,
        crate::students::handlers::list_cities,
        crate::students::handlers::get_student,
        crate::students::handlers::update_student,
        crate::students::handlers::delete_student,
        crate::admin::clear_db,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            UserProfile,
            VerifyResponse,
            NewStudent,
            StudentPatch,
            Student,
            StudentPage,
            MessageResponse,
            ClearDbResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "System", description = "Health and service metadata"),
        (name = "Auth", description = "Registration, login, and token verification"),
        (name = "Students", description = "Owner-scoped student records"),
        (name = "Admin", description = "Maintenance operations"),
    )
)]
pub struct ApiDoc;
