//! Student record management
//!
//! Owner-scoped CRUD plus the listing engine: search, filters, sorting
//! with silent fallbacks, and pagination with a one-page floor.

pub mod handlers;
pub mod models;
pub mod query;
pub mod repository;

pub use models::{NewStudent, Student, StudentPatch};
pub use query::{ListParams, ListQuery, SortField, SortOrder, StudentPage, StudentQuery};
pub use repository::StudentRepository;
