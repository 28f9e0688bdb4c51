//! Authentication service.
//!
//! Orchestrates the session lifecycle — registration, login, silent renewal,
//! logout, and password reset — over the user repository and the token
//! issuer.
//!
//! Renewal tokens are single-slot: each user has at most one live refresh
//! reference, and issuing a new one invalidates the previous. Presenting a
//! refresh token that is not the stored one fails with
//! [`AuthError::RevokedToken`], which is what makes renewal revocable.

mod error;
pub mod tokens;

pub use error::AuthError;
pub use tokens::{Claims, TokenIssuer, TokenPair};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use serde::Deserialize;
use sqlx::PgPool;

use juniper_core::{Address, Email, Role, UserId};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::user::{NewUserRecord, ProfileChanges, ProfilePic, User};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Registration request payload.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub city: String,
    pub country: String,
    pub phone: String,
    pub addresses: Vec<Address>,
    pub profile_pic: Option<ProfilePic>,
    pub role: Option<Role>,
}

/// Authentication service.
///
/// Handles registration, the login/renew/logout lifecycle, and password
/// changes.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    tokens: &'a TokenIssuer,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, tokens: &'a TokenIssuer) -> Self {
        Self {
            users: UserRepository::new(pool),
            tokens,
        }
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` for missing fields, bad addresses, or
    /// a malformed phone number; `AuthError::InvalidEmail` /
    /// `AuthError::WeakPassword` for those specific fields; and
    /// `AuthError::UserAlreadyExists` if the email is taken.
    pub async fn register(&self, request: RegisterRequest) -> Result<User, AuthError> {
        validate_required(&request)?;
        validate_addresses(&request.addresses)?;
        validate_phone(&request.phone)?;

        let email = Email::parse(&request.email)?;
        validate_password(&request.password)?;
        let password_hash = hash_password(&request.password)?;

        let record = NewUserRecord {
            email,
            name: request.name,
            password_hash,
            addresses: request.addresses,
            city: request.city,
            country: request.country,
            phone: request.phone,
            profile_pic: request.profile_pic,
            role: request.role.unwrap_or_default(),
        };

        let user = self.users.create(&record).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
            other => AuthError::Repository(other),
        })?;

        Ok(user)
    }

    // =========================================================================
    // Session lifecycle
    // =========================================================================

    /// Login with email and password, returning the user and a fresh token
    /// pair. The new refresh token becomes the user's single live reference.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email is unknown or the
    /// password is wrong (same kind for both).
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, TokenPair), AuthError> {
        let email = Email::parse(email)?;

        let (user, password_hash) = self
            .users
            .get_auth_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        let pair = self.issue_pair(user.id).await?;

        Ok((user, pair))
    }

    /// Exchange a refresh token for a brand-new pair.
    ///
    /// The presented token must verify (signature and expiry checked first)
    /// and must equal the user's stored reference. On success the new refresh
    /// token overwrites the stored one, so each refresh token is usable for
    /// at most one renewal.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingToken` when no token is given,
    /// `AuthError::InvalidToken` on signature/expiry failure, and
    /// `AuthError::RevokedToken` when the token is not the stored reference.
    pub async fn renew(&self, refresh_token: Option<&str>) -> Result<TokenPair, AuthError> {
        let presented = refresh_token.ok_or(AuthError::MissingToken)?;

        // Expiry/signature first: an expired token is InvalidToken even if it
        // still matches the stored reference.
        let claims = self.tokens.verify(presented)?;
        let user_id = claims.user_id();

        let stored = self.users.get_refresh_token(user_id).await?;
        if stored.as_deref() != Some(presented) {
            return Err(AuthError::RevokedToken);
        }

        self.issue_pair(user_id).await
    }

    /// Clear the user's refresh reference.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NoActiveSession` when there is no live reference
    /// to clear (e.g. a second logout).
    pub async fn logout(&self, user_id: UserId) -> Result<(), AuthError> {
        if self.users.get_refresh_token(user_id).await?.is_none() {
            return Err(AuthError::NoActiveSession);
        }

        self.users.clear_refresh_token(user_id).await?;
        Ok(())
    }

    // =========================================================================
    // Password reset
    // =========================================================================

    /// Start a password reset: mint a short-lived reset token for the account
    /// with this email. Delivery is the caller's job.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if no account has this email.
    pub async fn forgot_password(&self, email: &str) -> Result<(User, String), AuthError> {
        let email = Email::parse(email)?;

        let user = self
            .users
            .get_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let reset_token = self.tokens.issue_reset(user.id)?;

        Ok((user, reset_token))
    }

    /// Complete a password reset with a reset token and a new password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` for a bad or expired token,
    /// `AuthError::WeakPassword` if the new password fails validation, and
    /// `AuthError::UserNotFound` if the account no longer exists.
    pub async fn reset_password(&self, reset_token: &str, new_password: &str) -> Result<(), AuthError> {
        let claims = self.tokens.verify(reset_token)?;

        validate_password(new_password)?;
        let password_hash = hash_password(new_password)?;

        let updated = self
            .users
            .update_password_hash(claims.user_id(), &password_hash)
            .await?;
        if !updated {
            return Err(AuthError::UserNotFound);
        }

        Ok(())
    }

    /// Change the password of an authenticated user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the old password is wrong
    /// and `AuthError::WeakPassword` if the new one fails validation.
    pub async fn change_password(
        &self,
        user_id: UserId,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let current_hash = self
            .users
            .get_password_hash(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        verify_password(old_password, &current_hash)?;

        validate_password(new_password)?;
        let password_hash = hash_password(new_password)?;
        self.users.update_password_hash(user_id, &password_hash).await?;

        Ok(())
    }

    // =========================================================================
    // Profile
    // =========================================================================

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the user doesn't exist.
    pub async fn get_user(&self, user_id: UserId) -> Result<User, AuthError> {
        self.users
            .get_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// Apply a partial profile update. Secret fields are not reachable from
    /// here, so no re-hash can be triggered.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` when no field is set,
    /// `AuthError::UserAlreadyExists` when a changed email is taken, and
    /// `AuthError::UserNotFound` if the user doesn't exist.
    pub async fn update_profile(
        &self,
        user_id: UserId,
        changes: &ProfileChanges,
    ) -> Result<User, AuthError> {
        if changes.is_empty() {
            return Err(AuthError::Validation(
                "at least one field is required to update".to_owned(),
            ));
        }

        if let Some(addresses) = &changes.addresses {
            validate_addresses(addresses)?;
        }
        if let Some(phone) = &changes.phone {
            validate_phone(phone)?;
        }

        self.users
            .update_profile(user_id, changes)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?
            .ok_or(AuthError::UserNotFound)
    }

    /// Issue an access/refresh pair and record the refresh token as the
    /// user's single live reference.
    async fn issue_pair(&self, user_id: UserId) -> Result<TokenPair, AuthError> {
        let access_token = self.tokens.issue_access(user_id)?;
        let refresh_token = self.tokens.issue_refresh(user_id)?;

        self.users.set_refresh_token(user_id, &refresh_token).await?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }
}

// =============================================================================
// Validation helpers
// =============================================================================

fn validate_required(request: &RegisterRequest) -> Result<(), AuthError> {
    let missing = [
        ("name", &request.name),
        ("email", &request.email),
        ("password", &request.password),
        ("city", &request.city),
        ("country", &request.country),
        ("phone", &request.phone),
    ]
    .iter()
    .any(|(_, value)| value.trim().is_empty());

    if missing {
        return Err(AuthError::Validation("please provide all fields".to_owned()));
    }

    Ok(())
}

fn validate_addresses(addresses: &[Address]) -> Result<(), AuthError> {
    if addresses.is_empty() {
        return Err(AuthError::Validation(
            "at least one address is required".to_owned(),
        ));
    }

    for address in addresses {
        let complete = !address.street.trim().is_empty()
            && !address.landmark.trim().is_empty()
            && !address.city.trim().is_empty()
            && !address.country.trim().is_empty()
            && !address.postal_code.trim().is_empty();
        if !complete {
            return Err(AuthError::Validation(
                "each address must contain street, landmark, city, country, and postal code"
                    .to_owned(),
            ));
        }
    }

    Ok(())
}

fn validate_phone(phone: &str) -> Result<(), AuthError> {
    if phone.len() != 10 || !phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(AuthError::Validation(
            "phone number must be exactly 10 digits".to_owned(),
        ));
    }
    Ok(())
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use juniper_core::AddressType;

    fn address() -> Address {
        Address {
            street: "12 Rose Lane".to_owned(),
            landmark: "Near the old mill".to_owned(),
            city: "Portland".to_owned(),
            country: "USA".to_owned(),
            postal_code: "97201".to_owned(),
            address_type: AddressType::Home,
        }
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("correct horse").unwrap();
        assert_ne!(hash, "correct horse");
        assert!(verify_password("correct horse", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong horse", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same password").unwrap();
        let b = hash_password("same password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_validate_password_length() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("longer").is_ok());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("1234567890").is_ok());
        assert!(validate_phone("123456789").is_err());
        assert!(validate_phone("12345678901").is_err());
        assert!(validate_phone("12345abcde").is_err());
    }

    #[test]
    fn test_validate_addresses_rejects_empty_list() {
        assert!(matches!(
            validate_addresses(&[]),
            Err(AuthError::Validation(_))
        ));
        assert!(validate_addresses(&[address()]).is_ok());
    }

    #[test]
    fn test_validate_addresses_rejects_blank_field() {
        let mut bad = address();
        bad.postal_code = "  ".to_owned();
        assert!(matches!(
            validate_addresses(&[address(), bad]),
            Err(AuthError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_required_fields() {
        let request = RegisterRequest {
            name: "Someone".to_owned(),
            email: "s@example.com".to_owned(),
            password: "hunter22".to_owned(),
            city: String::new(),
            country: "USA".to_owned(),
            phone: "1234567890".to_owned(),
            addresses: vec![address()],
            profile_pic: None,
            role: None,
        };
        assert!(matches!(
            validate_required(&request),
            Err(AuthError::Validation(_))
        ));
    }
}
