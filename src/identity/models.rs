//! Identity data models

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// A registered account. The stored password hash stays inside this row
/// type and the credential layer; it is never serialized.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public view of a user, safe to return from the API.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserProfile {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "user1@example.com")]
    pub email: String,
    #[schema(example = "Jane Doe")]
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            created_at: user.created_at,
        }
    }
}
