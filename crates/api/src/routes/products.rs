//! Product route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use juniper_core::{CategoryId, ProductId, SubCategoryId};

use crate::db::products::{NewProduct, ProductChanges, ProductRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::catalog::{Product, ProductExpanded};
use crate::state::AppState;

use super::subcategories::DeleteManyResponse;

/// Bulk delete payload.
#[derive(Debug, Deserialize)]
pub struct DeleteManyRequest {
    pub ids: Vec<ProductId>,
}

/// Create a product.
#[instrument(skip(state, _user, new), fields(name = %new.name))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Json(new): Json<NewProduct>,
) -> Result<impl IntoResponse> {
    if new.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".to_owned()));
    }

    let product = ProductRepository::new(state.pool()).create(&new).await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// List all products, with category and sub-category joined in.
#[instrument(skip(state, _user))]
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> Result<Json<Vec<ProductExpanded>>> {
    let products = ProductRepository::new(state.pool()).list_expanded().await?;
    Ok(Json(products))
}

/// Fetch a product by ID, expanded.
#[instrument(skip(state, _user))]
pub async fn get(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductExpanded>> {
    let product = ProductRepository::new(state.pool())
        .get_by_id_expanded(id)
        .await?
        .ok_or_else(|| AppError::NotFound("product not found".to_owned()))?;

    Ok(Json(product))
}

/// List the products of a category, expanded.
///
/// This endpoint is public (no bearer token required).
#[instrument(skip(state))]
pub async fn list_by_category(
    State(state): State<AppState>,
    Path(category_id): Path<CategoryId>,
) -> Result<Json<Vec<ProductExpanded>>> {
    let products = ProductRepository::new(state.pool())
        .list_by_category_expanded(category_id)
        .await?;
    if products.is_empty() {
        return Err(AppError::NotFound(
            "no products found for the given category".to_owned(),
        ));
    }

    Ok(Json(products))
}

/// List the products of a sub-category, expanded.
#[instrument(skip(state, _user))]
pub async fn list_by_sub_category(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(sub_category_id): Path<SubCategoryId>,
) -> Result<Json<Vec<ProductExpanded>>> {
    let products = ProductRepository::new(state.pool())
        .list_by_sub_category_expanded(sub_category_id)
        .await?;
    if products.is_empty() {
        return Err(AppError::NotFound(
            "no products found in the given sub-category".to_owned(),
        ));
    }

    Ok(Json(products))
}

/// Apply a partial product update.
#[instrument(skip(state, _user, changes))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<ProductId>,
    Json(changes): Json<ProductChanges>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool())
        .update(id, &changes)
        .await?
        .ok_or_else(|| AppError::NotFound("product not found".to_owned()))?;

    Ok(Json(product))
}

/// Delete a product.
#[instrument(skip(state, _user))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<ProductId>,
) -> Result<StatusCode> {
    let deleted = ProductRepository::new(state.pool()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("product not found".to_owned()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Delete several products in one request.
#[instrument(skip(state, _user, request))]
pub async fn delete_many(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Json(request): Json<DeleteManyRequest>,
) -> Result<Json<DeleteManyResponse>> {
    let deleted = ProductRepository::new(state.pool())
        .delete_many(&request.ids)
        .await?;
    if deleted == 0 {
        return Err(AppError::NotFound("no products were deleted".to_owned()));
    }

    Ok(Json(DeleteManyResponse { deleted }))
}
