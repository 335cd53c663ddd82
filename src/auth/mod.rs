//! Authentication and authorization
//!
//! - [`password`] - Argon2id credential hashing and verification
//! - [`token`] - signed, time-bounded identity tokens
//! - [`service`] - registration, login, and identity resolution
//! - [`middleware`] - axum layer injecting the verified caller
//! - [`handlers`] - HTTP endpoints under /api/v1/auth

pub mod handlers;
pub mod middleware;
pub mod password;
pub mod service;
pub mod token;

pub use middleware::{CurrentUser, auth_middleware};
pub use password::CredentialStore;
pub use service::AuthService;
pub use token::{Claims, TokenError, TokenService};
