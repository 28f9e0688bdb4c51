//! Sub-category route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use juniper_core::{CategoryId, SubCategoryId};

use crate::db::subcategories::{SubCategoryRepository, SubCategoryUpdate};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::catalog::SubCategory;
use crate::state::AppState;

use super::categories::CountResponse;

/// Sub-category create payload.
#[derive(Debug, Deserialize)]
pub struct CreateSubCategoryRequest {
    pub name: String,
    pub thumbnail: Option<String>,
    pub category_id: CategoryId,
}

/// Sub-category update payload; at least one field must be set.
#[derive(Debug, Deserialize)]
pub struct UpdateSubCategoryRequest {
    pub name: Option<String>,
    pub thumbnail: Option<String>,
    pub category_id: Option<CategoryId>,
}

/// Bulk delete payload.
#[derive(Debug, Deserialize)]
pub struct DeleteManyRequest {
    pub ids: Vec<SubCategoryId>,
}

/// Bulk delete response.
#[derive(Debug, Serialize)]
pub struct DeleteManyResponse {
    pub deleted: u64,
}

/// Create a sub-category.
#[instrument(skip(state, _user, request))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Json(request): Json<CreateSubCategoryRequest>,
) -> Result<impl IntoResponse> {
    if request.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".to_owned()));
    }

    let sub_category = SubCategoryRepository::new(state.pool())
        .create(
            request.name.trim(),
            request.thumbnail.as_deref(),
            request.category_id,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(sub_category)))
}

/// List all sub-categories.
#[instrument(skip(state, _user))]
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> Result<Json<Vec<SubCategory>>> {
    let sub_categories = SubCategoryRepository::new(state.pool()).list().await?;
    Ok(Json(sub_categories))
}

/// Count all sub-categories.
#[instrument(skip(state, _user))]
pub async fn count(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> Result<Json<CountResponse>> {
    let count = SubCategoryRepository::new(state.pool()).count().await?;
    Ok(Json(CountResponse { count }))
}

/// Fetch a sub-category by ID.
#[instrument(skip(state, _user))]
pub async fn get(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<SubCategoryId>,
) -> Result<Json<SubCategory>> {
    let sub_category = SubCategoryRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("sub-category not found".to_owned()))?;

    Ok(Json(sub_category))
}

/// List the sub-categories of a category.
#[instrument(skip(state, _user))]
pub async fn list_by_category(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(category_id): Path<CategoryId>,
) -> Result<Json<Vec<SubCategory>>> {
    let sub_categories = SubCategoryRepository::new(state.pool())
        .list_by_category(category_id)
        .await?;

    Ok(Json(sub_categories))
}

/// Apply a partial sub-category update.
#[instrument(skip(state, _user, request))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<SubCategoryId>,
    Json(request): Json<UpdateSubCategoryRequest>,
) -> Result<Json<SubCategory>> {
    if request.name.is_none() && request.thumbnail.is_none() && request.category_id.is_none() {
        return Err(AppError::BadRequest(
            "name, thumbnail, or category must be provided".to_owned(),
        ));
    }

    let sub_category = SubCategoryRepository::new(state.pool())
        .update(
            id,
            request.name.as_deref(),
            request.thumbnail.as_deref(),
            request.category_id,
        )
        .await?
        .ok_or_else(|| AppError::NotFound("sub-category not found".to_owned()))?;

    Ok(Json(sub_category))
}

/// Apply several partial updates in one request.
#[instrument(skip(state, _user, updates))]
pub async fn update_many(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Json(updates): Json<Vec<SubCategoryUpdate>>,
) -> Result<Json<Vec<SubCategory>>> {
    let updated = SubCategoryRepository::new(state.pool())
        .update_many(&updates)
        .await?;

    Ok(Json(updated))
}

/// Delete a sub-category.
#[instrument(skip(state, _user))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<SubCategoryId>,
) -> Result<StatusCode> {
    let deleted = SubCategoryRepository::new(state.pool()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("sub-category not found".to_owned()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Delete several sub-categories in one request.
#[instrument(skip(state, _user, request))]
pub async fn delete_many(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Json(request): Json<DeleteManyRequest>,
) -> Result<Json<DeleteManyResponse>> {
    let deleted = SubCategoryRepository::new(state.pool())
        .delete_many(&request.ids)
        .await?;
    if deleted == 0 {
        return Err(AppError::NotFound("no sub-categories were deleted".to_owned()));
    }

    Ok(Json(DeleteManyResponse { deleted }))
}
