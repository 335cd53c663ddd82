//! Identity management
//!
//! Registered accounts that authenticate and own student records.

pub mod models;
pub mod repository;

pub use models::{User, UserProfile};
pub use repository::UserRepository;
