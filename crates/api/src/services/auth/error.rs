//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

use super::tokens::TokenError;

/// Errors that can occur during authentication operations.
///
/// Every failure is a distinguishable kind; none is retried automatically.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] juniper_core::EmailError),

    /// Wrong password or unknown email — deliberately the same kind, so the
    /// response does not leak which field was wrong.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// User not found.
    #[error("user not found")]
    UserNotFound,

    /// Email already registered.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Missing or malformed request fields.
    #[error("validation failed: {0}")]
    Validation(String),

    /// No token was presented.
    #[error("token is missing")]
    MissingToken,

    /// Bad signature, malformed, or expired token.
    #[error("invalid or expired token")]
    InvalidToken,

    /// Structurally valid refresh token that is not the user's current one.
    #[error("token has been revoked")]
    RevokedToken,

    /// Logout with no live refresh reference.
    #[error("no active session")]
    NoActiveSession,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Token signing error.
    #[error("token signing error")]
    TokenSigning,
}

impl From<TokenError> for AuthError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Invalid => Self::InvalidToken,
            TokenError::Signing => Self::TokenSigning,
        }
    }
}
