//! Repository layer for identity rows

use super::models::User;
use sqlx::PgPool;

/// User repository for CRUD operations
pub struct UserRepository;

impl UserRepository {
    /// Get user by ID
    pub async fn get_by_id(pool: &PgPool, user_id: i64) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"SELECT id, email, name, password_hash, created_at, updated_at
               FROM users WHERE id = $1"#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// Get user by email. Callers normalize the email to lowercase first.
    pub async fn get_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"SELECT id, email, name, password_hash, created_at, updated_at
               FROM users WHERE email = $1"#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await
    }

    /// Create a new user; the unique index on email rejects duplicates.
    pub async fn create(
        pool: &PgPool,
        email: &str,
        name: &str,
        password_hash: &str,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"INSERT INTO users (email, name, password_hash)
               VALUES ($1, $2, $3)
               RETURNING id, email, name, password_hash, created_at, updated_at"#,
        )
        .bind(email)
        .bind(name)
        .bind(password_hash)
        .fetch_one(pool)
        .await
    }
}
