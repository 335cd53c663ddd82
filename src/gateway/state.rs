//! Shared gateway state

use std::sync::Arc;

use crate::auth::AuthService;
use crate::db::Database;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL record store.
    pub db: Arc<Database>,
    /// Registration, login, and identity resolution.
    pub auth: AuthService,
    /// Out-of-band gate for maintenance endpoints.
    pub admin_secret: String,
}

impl AppState {
    pub fn new(db: Arc<Database>, auth: AuthService, admin_secret: String) -> Self {
        Self {
            db,
            auth,
            admin_secret,
        }
    }
}
