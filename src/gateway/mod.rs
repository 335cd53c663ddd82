//! HTTP gateway
//!
//! Router assembly and server startup. Public routes (register, login,
//! health, docs) sit outside the auth middleware; everything under
//! /api/v1/students goes through it.

pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware::from_fn_with_state,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::admin;
use crate::auth::{self, auth_middleware};
use crate::config::AppConfig;
use crate::students;
use openapi::ApiDoc;
use state::AppState;

/// Browser CORS layer from the configured origin list.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| o.parse::<HeaderValue>().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// Build the full application router.
pub fn build_router(config: &AppConfig, state: Arc<AppState>) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(auth::handlers::register))
        .route("/login", post(auth::handlers::login))
        .merge(
            Router::new()
                .route("/me", get(auth::handlers::me))
                .route("/verify", get(auth::handlers::verify))
                .layer(from_fn_with_state(state.clone(), auth_middleware)),
        );

    let student_routes = Router::new()
        .route(
            "/",
            post(students::handlers::create_student).get(students::handlers::list_students),
        )
        .route("/all", get(students::handlers::list_all_students))
        .route("/courses", get(students::handlers::list_courses))
        .route("/cities", get(students::handlers::list_cities))
        .route(
            "/{student_id}",
            get(students::handlers::get_student)
                .put(students::handlers::update_student)
                .delete(students::handlers::delete_student),
        )
        .layer(from_fn_with_state(state.clone(), auth_middleware));

    let admin_routes = Router::new().route("/clear-db", post(admin::clear_db));

    Router::new()
        .route("/", get(handlers::service_info))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/students", student_routes)
        .nest("/api/v1/admin", admin_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors_layer(&config.cors_origins))
        .with_state(state)
}

/// Start the HTTP gateway and serve until the process exits.
pub async fn run_server(config: AppConfig, state: Arc<AppState>) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let app = build_router(&config, state);

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("gateway listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
