//! Authentication middleware and extractors.
//!
//! Provides the [`RequireAuth`] extractor: verifies the bearer access token
//! and loads the authenticated user before the handler runs.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};

use crate::error::AppError;
use crate::models::user::User;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

/// Extractor that requires a valid bearer access token.
///
/// Rejects with `MissingToken` (401) when no `Authorization: Bearer` header
/// is present, `InvalidToken` (403) when signature/expiry verification
/// fails, and `UserNotFound` (404) when the token's subject no longer
/// exists.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
pub struct RequireAuth(pub User);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(AuthError::MissingToken)?;

        let claims = state
            .tokens()
            .verify(token)
            .map_err(|_| AuthError::InvalidToken)?;

        let user = AuthService::new(state.pool(), state.tokens())
            .get_user(claims.user_id())
            .await?;

        Ok(Self(user))
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
#[must_use]
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with_auth(value: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(value) = value {
            headers.insert(AUTHORIZATION, value.parse().expect("valid header value"));
        }
        headers
    }

    #[test]
    fn test_bearer_token_present() {
        let headers = headers_with_auth(Some("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn test_bearer_token_missing_header() {
        let headers = headers_with_auth(None);
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_bearer_token_wrong_scheme() {
        let headers = headers_with_auth(Some("Basic dXNlcjpwYXNz"));
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_bearer_token_empty_value() {
        let headers = headers_with_auth(Some("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }
}
