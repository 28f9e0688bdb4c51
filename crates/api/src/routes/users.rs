//! Account route handlers: registration, session lifecycle, profile, and
//! password management.

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;
use crate::middleware::{RequireAuth, auth::bearer_token};
use crate::models::user::{ProfileChanges, User};
use crate::services::auth::{AuthService, RegisterRequest, TokenPair};
use crate::state::AppState;

/// Login request payload.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response: the token pair plus a safe user projection.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

/// Renewal request payload. The token may instead arrive as a bearer header.
#[derive(Debug, Default, Deserialize)]
pub struct RenewRequest {
    pub refresh_token: Option<String>,
}

/// Password change request payload.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// Reset-link request payload.
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Reset completion payload.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub reset_token: String,
    pub new_password: String,
}

/// Register a new account.
#[instrument(skip(state, request), fields(email = %request.email))]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    let auth = AuthService::new(state.pool(), state.tokens());
    let user = auth.register(request).await?;

    tracing::info!(user_id = %user.id, "user registered");
    Ok((StatusCode::CREATED, Json(user)))
}

/// Login with email and password.
#[instrument(skip(state, request), fields(email = %request.email))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let auth = AuthService::new(state.pool(), state.tokens());
    let (user, pair) = auth.login(&request.email, &request.password).await?;

    tracing::info!(user_id = %user.id, "user logged in");
    Ok(Json(LoginResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
        user,
    }))
}

/// Exchange a refresh token for a fresh pair.
///
/// The token is taken from the JSON body, falling back to the
/// `Authorization: Bearer` header.
#[instrument(skip(state, headers, body))]
pub async fn renew(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Option<Json<RenewRequest>>,
) -> Result<Json<TokenPair>> {
    let from_body = body.and_then(|Json(request)| request.refresh_token);
    let token = from_body
        .as_deref()
        .or_else(|| bearer_token(&headers));

    let auth = AuthService::new(state.pool(), state.tokens());
    let pair = auth.renew(token).await?;

    Ok(Json(pair))
}

/// Clear the caller's refresh reference.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn logout(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<StatusCode> {
    let auth = AuthService::new(state.pool(), state.tokens());
    auth.logout(user.id).await?;

    tracing::info!(user_id = %user.id, "user logged out");
    Ok(StatusCode::NO_CONTENT)
}

/// Fetch the caller's profile.
#[instrument(skip(user), fields(user_id = %user.id))]
pub async fn get_profile(RequireAuth(user): RequireAuth) -> Json<User> {
    Json(user)
}

/// Apply a partial profile update.
#[instrument(skip(state, user, changes), fields(user_id = %user.id))]
pub async fn update_profile(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(changes): Json<ProfileChanges>,
) -> Result<Json<User>> {
    let auth = AuthService::new(state.pool(), state.tokens());
    let updated = auth.update_profile(user.id, &changes).await?;

    Ok(Json(updated))
}

/// Change the caller's password after verifying the old one.
#[instrument(skip(state, user, request), fields(user_id = %user.id))]
pub async fn change_password(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<StatusCode> {
    let auth = AuthService::new(state.pool(), state.tokens());
    auth.change_password(user.id, &request.old_password, &request.new_password)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Send a password-reset link to the account with this email.
#[instrument(skip(state, request))]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(request): Json<ForgotPasswordRequest>,
) -> Result<StatusCode> {
    let auth = AuthService::new(state.pool(), state.tokens());
    let (user, reset_token) = auth.forgot_password(&request.email).await?;

    let reset_url = format!(
        "{}/reset-password/{reset_token}",
        state.config().frontend_url.trim_end_matches('/')
    );

    match state.mailer() {
        Some(mailer) => {
            mailer
                .send_password_reset(user.email.as_str(), &reset_url)
                .await?;
        }
        None => {
            // No SMTP configured (dev setups): the reset link is minted but
            // cannot be delivered.
            tracing::warn!(user_id = %user.id, "reset requested but email delivery is not configured");
        }
    }

    Ok(StatusCode::ACCEPTED)
}

/// Complete a password reset with a reset token.
#[instrument(skip(state, request))]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<StatusCode> {
    let auth = AuthService::new(state.pool(), state.tokens());
    auth.reset_password(&request.reset_token, &request.new_password)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
