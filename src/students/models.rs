//! Student data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// An owned student record. Visible and mutable only through operations
/// scoped by `owner_id` equality.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct Student {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Alice Chen")]
    pub name: String,
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[schema(example = 21)]
    pub age: i32,
    #[schema(example = "Math")]
    pub course: String,
    #[schema(example = "Boston")]
    pub city: String,
    /// Identity that created the record; never reassigned.
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Creation payload; every field required.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NewStudent {
    #[schema(example = "Alice Chen")]
    #[validate(length(min = 2, max = 100, message = "name must be 2-100 characters"))]
    pub name: String,
    #[schema(example = "alice@example.com")]
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[schema(example = 21)]
    #[validate(range(min = 1, max = 150, message = "age must be 1-150"))]
    pub age: i32,
    #[schema(example = "Math")]
    #[validate(length(min = 2, max = 100, message = "course must be 2-100 characters"))]
    pub course: String,
    #[schema(example = "Boston")]
    #[validate(length(min = 2, max = 100, message = "city must be 2-100 characters"))]
    pub city: String,
}

/// Partial update; only supplied fields are applied.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct StudentPatch {
    #[validate(length(min = 2, max = 100, message = "name must be 2-100 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,
    #[validate(range(min = 1, max = 150, message = "age must be 1-150"))]
    pub age: Option<i32>,
    #[validate(length(min = 2, max = 100, message = "course must be 2-100 characters"))]
    pub course: Option<String>,
    #[validate(length(min = 2, max = 100, message = "city must be 2-100 characters"))]
    pub city: Option<String>,
}

impl StudentPatch {
    /// True when no field was supplied at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.age.is_none()
            && self.course.is_none()
            && self.city.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_new() -> NewStudent {
        NewStudent {
            name: "Alice Chen".to_string(),
            email: "alice@example.com".to_string(),
            age: 21,
            course: "Math".to_string(),
            city: "Boston".to_string(),
        }
    }

    #[test]
    fn valid_payload_passes() {
        assert!(valid_new().validate().is_ok());
    }

    #[test]
    fn age_bounds_enforced() {
        let too_young = NewStudent { age: 0, ..valid_new() };
        assert!(too_young.validate().is_err());

        let too_old = NewStudent { age: 151, ..valid_new() };
        assert!(too_old.validate().is_err());

        let edge_low = NewStudent { age: 1, ..valid_new() };
        assert!(edge_low.validate().is_ok());

        let edge_high = NewStudent { age: 150, ..valid_new() };
        assert!(edge_high.validate().is_ok());
    }

    #[test]
    fn name_and_course_lengths_enforced() {
        let short_name = NewStudent { name: "A".to_string(), ..valid_new() };
        assert!(short_name.validate().is_err());

        let short_course = NewStudent { course: "X".to_string(), ..valid_new() };
        assert!(short_course.validate().is_err());
    }

    #[test]
    fn patch_validates_only_supplied_fields() {
        let empty = StudentPatch::default();
        assert!(empty.is_empty());
        assert!(empty.validate().is_ok());

        let age_only = StudentPatch {
            age: Some(30),
            ..StudentPatch::default()
        };
        assert!(!age_only.is_empty());
        assert!(age_only.validate().is_ok());

        let bad_age = StudentPatch {
            age: Some(200),
            ..StudentPatch::default()
        };
        assert!(bad_age.validate().is_err());
    }
}
