//! Repository layer for student rows
//!
//! Every read and write is scoped by owner-id equality; the only query
//! that crosses owners is the global email-uniqueness check.

use sqlx::PgPool;

use super::models::{NewStudent, Student, StudentPatch};

/// Student repository for owner-scoped CRUD
pub struct StudentRepository;

impl StudentRepository {
    /// Insert a new record owned by `owner_id`. The unique index on email
    /// rejects duplicates the pre-check missed.
    pub async fn insert(
        pool: &PgPool,
        owner_id: i64,
        new: &NewStudent,
    ) -> Result<Student, sqlx::Error> {
        sqlx::query_as::<_, Student>(
            r#"INSERT INTO students (name, email, age, course, city, owner_id)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING id, name, email, age, course, city, owner_id, created_at, updated_at"#,
        )
        .bind(&new.name)
        .bind(&new.email)
        .bind(new.age)
        .bind(&new.course)
        .bind(&new.city)
        .bind(owner_id)
        .fetch_one(pool)
        .await
    }

    /// Fetch a record by id, only if owned by `owner_id`.
    pub async fn get_owned(
        pool: &PgPool,
        student_id: i64,
        owner_id: i64,
    ) -> Result<Option<Student>, sqlx::Error> {
        sqlx::query_as::<_, Student>(
            r#"SELECT id, name, email, age, course, city, owner_id, created_at, updated_at
               FROM students WHERE id = $1 AND owner_id = $2"#,
        )
        .bind(student_id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await
    }

    /// True when any record (of any owner) already uses `email`,
    /// optionally excluding one record id.
    pub async fn email_taken(
        pool: &PgPool,
        email: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS(
                 SELECT 1 FROM students
                 WHERE email = $1 AND ($2::BIGINT IS NULL OR id <> $2)
               )"#,
        )
        .bind(email)
        .bind(exclude_id)
        .fetch_one(pool)
        .await
    }

    /// Apply a partial update in one statement: supplied fields overlay
    /// the current values, so the change is all-or-nothing. The caller
    /// has already fetched `current` under the owner scope.
    pub async fn update(
        pool: &PgPool,
        current: &Student,
        patch: &StudentPatch,
    ) -> Result<Student, sqlx::Error> {
        let name = patch.name.as_deref().unwrap_or(&current.name);
        let email = patch.email.as_deref().unwrap_or(&current.email);
        let age = patch.age.unwrap_or(current.age);
        let course = patch.course.as_deref().unwrap_or(&current.course);
        let city = patch.city.as_deref().unwrap_or(&current.city);

        sqlx::query_as::<_, Student>(
            r#"UPDATE students
               SET name = $1, email = $2, age = $3, course = $4, city = $5, updated_at = now()
               WHERE id = $6 AND owner_id = $7
               RETURNING id, name, email, age, course, city, owner_id, created_at, updated_at"#,
        )
        .bind(name)
        .bind(email)
        .bind(age)
        .bind(course)
        .bind(city)
        .bind(current.id)
        .bind(current.owner_id)
        .fetch_one(pool)
        .await
    }

    /// Delete a record if owned by `owner_id`. Returns whether a row went.
    pub async fn delete_owned(
        pool: &PgPool,
        student_id: i64,
        owner_id: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1 AND owner_id = $2")
            .bind(student_id)
            .bind(owner_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
