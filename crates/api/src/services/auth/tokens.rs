//! Token issuance and verification.
//!
//! Access, refresh, and reset tokens are structurally identical HS256 JWTs
//! binding a user id to an expiry; only their lifetimes differ. The signing
//! key is injected at construction — nothing here reads the environment, so
//! tests can use a deterministic key.
//!
//! [`TokenIssuer::verify`] is a pure function of the token, the key, and the
//! clock. Refresh revocation is a separate equality check against the stored
//! reference, done by the lifecycle layer.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use juniper_core::UserId;

/// Access-token lifetime: 30 minutes.
pub const ACCESS_TOKEN_TTL_SECS: i64 = 30 * 60;

/// Refresh-token lifetime: 7 days.
pub const REFRESH_TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Password-reset token lifetime: 1 hour.
pub const RESET_TOKEN_TTL_SECS: i64 = 60 * 60;

/// Claims carried by every token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id.
    pub sub: i32,
    /// Issued-at (Unix timestamp, seconds).
    pub iat: i64,
    /// Expiry (Unix timestamp, seconds).
    pub exp: i64,
}

impl Claims {
    /// The user this token is bound to.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        UserId::new(self.sub)
    }
}

/// Token verification/issuance failures.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Bad signature, malformed token, or expired.
    #[error("invalid or expired token")]
    Invalid,
    /// Signing failed (should not happen with an HMAC key).
    #[error("token signing failed")]
    Signing,
}

/// An access/refresh token pair as returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Issues and verifies signed tokens with a single shared HMAC key.
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenIssuer {
    /// Build an issuer from the configured signing secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        let mut validation = Validation::new(Algorithm::HS256);
        // No clock-skew leeway: a token is expired the second `exp` passes.
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            validation,
        }
    }

    /// Issue a 30-minute access token.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if encoding fails.
    pub fn issue_access(&self, user_id: UserId) -> Result<String, TokenError> {
        self.issue(user_id, ACCESS_TOKEN_TTL_SECS)
    }

    /// Issue a 7-day refresh token.
    ///
    /// The caller is responsible for recording it as the user's single live
    /// refresh reference.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if encoding fails.
    pub fn issue_refresh(&self, user_id: UserId) -> Result<String, TokenError> {
        self.issue(user_id, REFRESH_TOKEN_TTL_SECS)
    }

    /// Issue a 1-hour password-reset token.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if encoding fails.
    pub fn issue_reset(&self, user_id: UserId) -> Result<String, TokenError> {
        self.issue(user_id, RESET_TOKEN_TTL_SECS)
    }

    /// Verify signature and expiry, returning the decoded claims.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Invalid` for a bad signature, malformed token, or
    /// expired token — the kinds are deliberately not distinguished.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| TokenError::Invalid)
    }

    fn issue(&self, user_id: UserId, ttl_secs: i64) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.as_i32(),
            iat: now,
            exp: now + ttl_secs,
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(|_| TokenError::Signing)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(&SecretString::from(
            "test-signing-key-0123456789abcdef-0123456789abcdef",
        ))
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let issuer = issuer();
        let token = issuer.issue_access(UserId::new(42)).unwrap();
        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.user_id(), UserId::new(42));
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let issuer = issuer();
        assert!(matches!(
            issuer.verify("not-a-token"),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_verify_rejects_wrong_key() {
        let token = issuer().issue_access(UserId::new(1)).unwrap();
        let other = TokenIssuer::new(&SecretString::from(
            "another-signing-key-fedcba9876543210-fedcba9876543210",
        ));
        assert!(matches!(other.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_verify_rejects_expired() {
        let issuer = issuer();
        let token = issuer.issue(UserId::new(1), -120).unwrap();
        assert!(matches!(issuer.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_access_refresh_reset_lifetimes() {
        let issuer = issuer();
        let user = UserId::new(7);

        let access = issuer.verify(&issuer.issue_access(user).unwrap()).unwrap();
        let refresh = issuer.verify(&issuer.issue_refresh(user).unwrap()).unwrap();
        let reset = issuer.verify(&issuer.issue_reset(user).unwrap()).unwrap();

        assert_eq!(access.exp - access.iat, ACCESS_TOKEN_TTL_SECS);
        assert_eq!(refresh.exp - refresh.iat, REFRESH_TOKEN_TTL_SECS);
        assert_eq!(reset.exp - reset.iat, RESET_TOKEN_TTL_SECS);
    }
}
