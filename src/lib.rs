//! roster - Multi-tenant student roster API
//!
//! Registered users authenticate with JWT bearer tokens and manage a
//! private set of student records. Every store operation is scoped by an
//! owner-equality predicate; the listing engine adds search, filters,
//! sorting with silent fallbacks, and pagination with a one-page floor.
//!
//! # Modules
//!
//! - [`config`] - immutable application configuration (yaml)
//! - [`db`] - PostgreSQL pool and schema bootstrap
//! - [`identity`] - registered accounts and their repository
//! - [`auth`] - password hashing, tokens, identity resolution
//! - [`students`] - owner-scoped records, CRUD, and the query engine
//! - [`admin`] - maintenance operations gated out-of-band
//! - [`gateway`] - axum routers, response envelope, OpenAPI docs
//! - [`logging`] - tracing initialization

pub mod admin;
pub mod auth;
pub mod config;
pub mod db;
pub mod gateway;
pub mod identity;
pub mod logging;
pub mod students;

// Convenient re-exports at crate root
pub use auth::{AuthService, CredentialStore, TokenService};
pub use config::AppConfig;
pub use db::Database;
pub use gateway::state::AppState;
