//! Registration, login, and identity resolution

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::ToSchema;
use validator::Validate;

use crate::db::is_unique_violation;
use crate::gateway::types::ApiError;
use crate::identity::{User, UserRepository};

use super::password::{CredentialStore, PasswordError};
use super::token::{TokenError, TokenService};

/// User Registration Request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "user1@example.com")]
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[schema(example = "Jane Doe")]
    #[validate(length(min = 2, max = 100, message = "name must be 2-100 characters"))]
    pub name: String,
    #[schema(example = "password123")]
    #[validate(length(min = 6, max = 72, message = "password must be 6-72 characters"))]
    pub password: String,
}

/// User Login Request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "user1@example.com")]
    pub email: String,
    #[schema(example = "password123")]
    pub password: String,
}

/// Auth Response (token + profile fields)
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    #[schema(example = "bearer")]
    pub token_type: &'static str,
    pub user_id: i64,
    pub email: String,
    pub name: String,
}

/// Emails are stored and compared lower-cased.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Authentication service: owns the credential store and token service,
/// reads identities through the shared pool.
#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    credentials: CredentialStore,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(db: PgPool, credentials: CredentialStore, tokens: TokenService) -> Self {
        Self {
            db,
            credentials,
            tokens,
        }
    }

    /// Register a new user. Duplicate email is a Conflict, whether caught
    /// by the pre-check or by the store's unique constraint on a race.
    pub async fn register(&self, req: RegisterRequest) -> Result<User, ApiError> {
        let email = normalize_email(&req.email);

        let existing = UserRepository::get_by_email(&self.db, &email)
            .await
            .map_err(|e| ApiError::db_error(format!("User lookup failed: {}", e)))?;
        if existing.is_some() {
            return Err(ApiError::conflict("Email already registered"));
        }

        let password_hash = self.credentials.hash(&req.password).map_err(|e| match e {
            PasswordError::EmptyPassword => ApiError::validation("Password must not be empty"),
            other => ApiError::internal(format!("Password hashing failed: {}", other)),
        })?;

        match UserRepository::create(&self.db, &email, &req.name, &password_hash).await {
            Ok(user) => {
                tracing::info!(user_id = user.id, "registered new user");
                Ok(user)
            }
            Err(e) if is_unique_violation(&e) => {
                Err(ApiError::conflict("Email already registered"))
            }
            Err(e) => Err(ApiError::db_error(format!("User insert failed: {}", e))),
        }
    }

    /// Authenticate and issue a token. Unknown email and wrong password
    /// produce the same answer; nothing here reveals which one it was.
    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse, ApiError> {
        let email = normalize_email(&req.email);

        let user = UserRepository::get_by_email(&self.db, &email)
            .await
            .map_err(|e| ApiError::db_error(format!("User lookup failed: {}", e)))?
            .ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;

        if !self.credentials.verify(&req.password, &user.password_hash) {
            return Err(ApiError::unauthorized("Invalid email or password"));
        }

        let token = self
            .tokens
            .issue(user.id, Utc::now())
            .map_err(|e| ApiError::internal(format!("Token issue failed: {}", e)))?;

        Ok(AuthResponse {
            token,
            token_type: "bearer",
            user_id: user.id,
            email: user.email,
            name: user.name,
        })
    }

    /// Resolve a raw Authorization header into a verified identity.
    ///
    /// Every call re-verifies the token and re-fetches the user row; there
    /// is no cache, so a deleted account is rejected immediately.
    pub async fn resolve(&self, raw_header: Option<&str>) -> Result<User, ApiError> {
        let header =
            raw_header.ok_or_else(|| ApiError::missing_auth("Missing Authorization header"))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::unauthorized("Invalid token format"))?;

        let user_id = self.tokens.verify(token, Utc::now()).map_err(|e| match e {
            TokenError::Expired => ApiError::unauthorized("Token has expired"),
            TokenError::Invalid => ApiError::unauthorized("Invalid token"),
        })?;

        UserRepository::get_by_id(&self.db, user_id)
            .await
            .map_err(|e| ApiError::db_error(format!("User lookup failed: {}", e)))?
            .ok_or_else(|| ApiError::unauthorized("Account no longer exists"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_normalization_lowercases_and_trims() {
        assert_eq!(normalize_email("  A@X.Com "), "a@x.com");
        assert_eq!(normalize_email("a@x.com"), "a@x.com");
    }

    #[test]
    fn register_request_bounds() {
        let ok = RegisterRequest {
            email: "a@x.com".to_string(),
            name: "Jo".to_string(),
            password: "secret".to_string(),
        };
        assert!(ok.validate().is_ok());

        let short_name = RegisterRequest {
            name: "J".to_string(),
            ..ok_request()
        };
        assert!(short_name.validate().is_err());

        let short_password = RegisterRequest {
            password: "12345".to_string(),
            ..ok_request()
        };
        assert!(short_password.validate().is_err());

        let bad_email = RegisterRequest {
            email: "not-an-email".to_string(),
            ..ok_request()
        };
        assert!(bad_email.validate().is_err());
    }

    fn ok_request() -> RegisterRequest {
        RegisterRequest {
            email: "a@x.com".to_string(),
            name: "Jane Doe".to_string(),
            password: "password123".to_string(),
        }
    }
}
