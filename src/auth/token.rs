//! Signed, time-bounded identity tokens
//!
//! HS256 JWTs carrying the subject id. Verification is a pure function of
//! (token, secret, now): the caller supplies the clock, which keeps expiry
//! checks deterministic under test and leaves no hidden state here.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user id as string)
    pub sub: String,
    /// Expiration time (UTC timestamp, seconds)
    pub exp: i64,
    /// Issued at (UTC timestamp, seconds)
    pub iat: i64,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is malformed or its signature does not verify")]
    Invalid,

    #[error("token has expired")]
    Expired,
}

/// Issues and verifies identity tokens with a process-wide secret.
///
/// Rotating the secret invalidates every outstanding token; that is the
/// accepted trade-off for keeping verification stateless.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    /// Issue a token for `subject_id`, expiring `ttl` after `now`.
    pub fn issue(&self, subject_id: i64, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims {
            sub: subject_id.to_string(),
            exp: (now + self.ttl).timestamp(),
            iat: now.timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(|_| TokenError::Invalid)
    }

    /// Verify signature and structure, then apply the expiry rule against
    /// the supplied clock: `now >= exp` is expired. Returns the subject id.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<i64, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked below against the caller's clock, not the
        // library's view of system time.
        validation.validate_exp = false;

        let data = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|_| TokenError::Invalid)?;

        if now.timestamp() >= data.claims.exp {
            return Err(TokenError::Expired);
        }

        data.claims.sub.parse::<i64>().map_err(|_| TokenError::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn service() -> TokenService {
        TokenService::new("unit-test-secret", 60)
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn issue_then_verify_returns_subject() {
        let tokens = service();
        let token = tokens.issue(42, at(1_000_000)).unwrap();
        assert_eq!(tokens.verify(&token, at(1_000_100)), Ok(42));
    }

    #[test]
    fn expiry_boundary_is_inclusive() {
        let tokens = service();
        let issued = at(1_000_000);
        let token = tokens.issue(7, issued).unwrap();
        let expiry = 1_000_000 + 60 * 60;

        // One second before expiry still verifies.
        assert_eq!(tokens.verify(&token, at(expiry - 1)), Ok(7));
        // At expiry (now >= exp) the token is dead.
        assert_eq!(tokens.verify(&token, at(expiry)), Err(TokenError::Expired));
        assert_eq!(
            tokens.verify(&token, at(expiry + 1)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn tampered_token_is_invalid() {
        let tokens = service();
        let token = tokens.issue(42, at(1_000_000)).unwrap();

        // Flip one byte in the payload segment; the MAC covers it.
        let mut bytes = token.into_bytes();
        let mid = bytes.len() / 2;
        bytes[mid] = if bytes[mid] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();

        assert_eq!(
            tokens.verify(&tampered, at(1_000_100)),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn token_signed_with_other_secret_is_invalid() {
        let token = TokenService::new("other-secret", 60)
            .issue(42, at(1_000_000))
            .unwrap();
        assert_eq!(
            service().verify(&token, at(1_000_100)),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn garbage_is_invalid_not_expired() {
        let tokens = service();
        assert_eq!(tokens.verify("", at(0)), Err(TokenError::Invalid));
        assert_eq!(
            tokens.verify("header.payload.signature", at(0)),
            Err(TokenError::Invalid)
        );
    }
}
