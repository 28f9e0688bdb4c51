//! Product-variant route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::instrument;

use juniper_core::{ProductId, VariantId};

use crate::db::variants::{NewVariant, VariantChanges, VariantRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::catalog::ProductVariant;
use crate::state::AppState;

/// Create a variant for a product.
#[instrument(skip(state, _user, new), fields(product_id = %new.product_id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Json(new): Json<NewVariant>,
) -> Result<impl IntoResponse> {
    let variant = VariantRepository::new(state.pool()).create(&new).await?;

    Ok((StatusCode::CREATED, Json(variant)))
}

/// Fetch a variant by ID.
#[instrument(skip(state, _user))]
pub async fn get(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<VariantId>,
) -> Result<Json<ProductVariant>> {
    let variant = VariantRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("product variant not found".to_owned()))?;

    Ok(Json(variant))
}

/// List every variant of a product.
#[instrument(skip(state, _user))]
pub async fn list_by_product(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(product_id): Path<ProductId>,
) -> Result<Json<Vec<ProductVariant>>> {
    let variants = VariantRepository::new(state.pool())
        .list_by_product(product_id)
        .await?;
    if variants.is_empty() {
        return Err(AppError::NotFound(
            "no variants found for this product".to_owned(),
        ));
    }

    Ok(Json(variants))
}

/// Apply a partial variant update.
#[instrument(skip(state, _user, changes))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<VariantId>,
    Json(changes): Json<VariantChanges>,
) -> Result<Json<ProductVariant>> {
    let variant = VariantRepository::new(state.pool())
        .update(id, &changes)
        .await?
        .ok_or_else(|| AppError::NotFound("product variant not found".to_owned()))?;

    Ok(Json(variant))
}

/// Delete a variant.
#[instrument(skip(state, _user))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<VariantId>,
) -> Result<StatusCode> {
    let deleted = VariantRepository::new(state.pool()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("product variant not found".to_owned()));
    }

    Ok(StatusCode::NO_CONTENT)
}
