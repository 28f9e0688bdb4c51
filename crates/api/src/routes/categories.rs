//! Category route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use juniper_core::CategoryId;

use crate::db::categories::CategoryRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::catalog::Category;
use crate::state::AppState;

/// Category create payload.
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub thumbnail: Option<String>,
}

/// Category update payload; at least one field must be set.
#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub thumbnail: Option<String>,
}

/// Entity count response.
#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: i64,
}

/// Create a category.
#[instrument(skip(state, _user, request))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Json(request): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse> {
    if request.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".to_owned()));
    }

    let category = CategoryRepository::new(state.pool())
        .create(request.name.trim(), request.thumbnail.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// List all categories.
#[instrument(skip(state, _user))]
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> Result<Json<Vec<Category>>> {
    let categories = CategoryRepository::new(state.pool()).list().await?;
    Ok(Json(categories))
}

/// Count all categories.
#[instrument(skip(state, _user))]
pub async fn count(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> Result<Json<CountResponse>> {
    let count = CategoryRepository::new(state.pool()).count().await?;
    Ok(Json(CountResponse { count }))
}

/// Fetch a category by ID.
#[instrument(skip(state, _user))]
pub async fn get(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<CategoryId>,
) -> Result<Json<Category>> {
    let category = CategoryRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("category not found".to_owned()))?;

    Ok(Json(category))
}

/// Apply a partial category update.
#[instrument(skip(state, _user, request))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<CategoryId>,
    Json(request): Json<UpdateCategoryRequest>,
) -> Result<Json<Category>> {
    if request.name.is_none() && request.thumbnail.is_none() {
        return Err(AppError::BadRequest(
            "name or thumbnail must be provided".to_owned(),
        ));
    }

    let category = CategoryRepository::new(state.pool())
        .update(id, request.name.as_deref(), request.thumbnail.as_deref())
        .await?
        .ok_or_else(|| AppError::NotFound("category not found".to_owned()))?;

    Ok(Json(category))
}

/// Delete a category.
#[instrument(skip(state, _user))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<CategoryId>,
) -> Result<StatusCode> {
    let deleted = CategoryRepository::new(state.pool()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("category not found".to_owned()));
    }

    Ok(StatusCode::NO_CONTENT)
}
