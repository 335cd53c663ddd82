//! Password hashing and verification
//!
//! Argon2id with an explicit work factor from configuration. The output is
//! a PHC string embedding algorithm, parameters, and a per-password random
//! salt, so verification needs nothing beyond the stored string itself.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PasswordError {
    #[error("password must not be empty")]
    EmptyPassword,

    #[error("invalid hash parameters: {0}")]
    BadParams(String),

    #[error("password hashing failed: {0}")]
    HashFailed(String),
}

/// Credential hasher with a fixed, deliberately expensive work factor.
/// Stateless; safe to share and call concurrently.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    params: Params,
}

impl CredentialStore {
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, PasswordError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| PasswordError::BadParams(e.to_string()))?;
        Ok(Self { params })
    }

    fn hasher(&self) -> Argon2<'_> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a plaintext password with a freshly generated salt.
    pub fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        if plaintext.is_empty() {
            return Err(PasswordError::EmptyPassword);
        }
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .hasher()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| PasswordError::HashFailed(e.to_string()))?;
        Ok(hash.to_string())
    }

    /// Verify a plaintext password against a stored PHC string.
    ///
    /// Any mismatch returns `false`, including a stored hash that fails to
    /// parse. Comparison inside the argon2 crate is constant-time.
    pub fn verify(&self, plaintext: &str, stored: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(stored) else {
            return false;
        };
        self.hasher()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum legal work factor keeps the suite fast; the algorithm is the
    // same one production parameters run.
    fn store() -> CredentialStore {
        CredentialStore::new(Params::MIN_M_COST, Params::MIN_T_COST, Params::MIN_P_COST).unwrap()
    }

    #[test]
    fn hash_then_verify_round_trips() {
        let store = store();
        let hash = store.hash("correct horse battery staple").unwrap();
        assert!(store.verify("correct horse battery staple", &hash));
    }

    #[test]
    fn wrong_password_fails_verification() {
        let store = store();
        let hash = store.hash("password-one").unwrap();
        assert!(!store.verify("password-two", &hash));
    }

    #[test]
    fn empty_password_is_rejected() {
        let store = store();
        assert_eq!(store.hash(""), Err(PasswordError::EmptyPassword));
    }

    #[test]
    fn malformed_stored_hash_verifies_false() {
        let store = store();
        assert!(!store.verify("anything", "not-a-phc-string"));
        assert!(!store.verify("anything", ""));
        assert!(!store.verify("anything", "$argon2id$truncated"));
    }

    #[test]
    fn same_password_hashes_differently() {
        // Fresh salt per call; equal outputs would mean salt reuse.
        let store = store();
        let first = store.hash("repeated").unwrap();
        let second = store.hash("repeated").unwrap();
        assert_ne!(first, second);
        assert!(store.verify("repeated", &first));
        assert!(store.verify("repeated", &second));
    }
}
