//! Cart route handlers.
//!
//! Every operation is scoped to the authenticated owner's cart. After each
//! mutation the total is recomputed from the full line set and the whole
//! document is written back in one row write.

use std::collections::HashMap;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use juniper_core::{ProductId, VariantId};

use crate::db::carts::CartRepository;
use crate::db::products::ProductRepository;
use crate::db::variants::VariantRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::cart::{
    Cart, CartExpanded, CartLine, CartLineExpanded, merge_line, remove_line, set_quantity, total,
};
use crate::state::AppState;

/// Add-item payload. The price is the unit price captured for the line.
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product: ProductId,
    pub variant: VariantId,
    pub quantity: u32,
    pub price: Decimal,
}

/// Set-quantity payload. The quantity overwrites, it does not add.
#[derive(Debug, Deserialize)]
pub struct SetQuantityRequest {
    pub product: ProductId,
    pub variant: VariantId,
    pub quantity: u32,
}

/// Remove-item payload.
#[derive(Debug, Deserialize)]
pub struct RemoveItemRequest {
    pub product: ProductId,
    pub variant: VariantId,
}

/// Add an item to the caller's cart, creating the cart on first add.
///
/// A repeated add of the same `(product, variant)` accumulates quantity on
/// the existing line and leaves its captured price untouched.
#[instrument(skip(state, user, request), fields(user_id = %user.id))]
pub async fn add_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<AddItemRequest>,
) -> Result<Json<Cart>> {
    let carts = CartRepository::new(state.pool());

    let mut items = carts
        .get_by_user(user.id)
        .await?
        .map(|cart| cart.items)
        .unwrap_or_default();

    merge_line(
        &mut items,
        request.product,
        request.variant,
        request.quantity,
        request.price,
    );

    let cart = carts.put(user.id, &items, total(&items)).await?;

    Ok(Json(cart))
}

/// Overwrite the quantity of one line.
#[instrument(skip(state, user, request), fields(user_id = %user.id))]
pub async fn set_item_quantity(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<SetQuantityRequest>,
) -> Result<Json<Cart>> {
    let carts = CartRepository::new(state.pool());

    let mut items = carts
        .get_by_user(user.id)
        .await?
        .map(|cart| cart.items)
        .ok_or_else(|| AppError::NotFound("cart not found".to_owned()))?;

    if !set_quantity(&mut items, request.product, request.variant, request.quantity) {
        return Err(AppError::NotFound("item not found in cart".to_owned()));
    }

    let cart = carts.put(user.id, &items, total(&items)).await?;

    Ok(Json(cart))
}

/// Remove one line. Removing a line that is not there is a no-op.
#[instrument(skip(state, user, request), fields(user_id = %user.id))]
pub async fn remove_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<RemoveItemRequest>,
) -> Result<Json<Cart>> {
    let carts = CartRepository::new(state.pool());

    let mut items = carts
        .get_by_user(user.id)
        .await?
        .map(|cart| cart.items)
        .ok_or_else(|| AppError::NotFound("cart not found".to_owned()))?;

    remove_line(&mut items, request.product, request.variant);

    let cart = carts.put(user.id, &items, total(&items)).await?;

    Ok(Json(cart))
}

/// Fetch the caller's cart with lines expanded against the catalog.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_cart(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<CartExpanded>> {
    let cart = CartRepository::new(state.pool())
        .get_by_user(user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("cart not found".to_owned()))?;

    let expanded = expand_cart(&state, cart).await?;

    Ok(Json(expanded))
}

/// Delete the caller's cart entirely.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn clear_cart(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<StatusCode> {
    let deleted = CartRepository::new(state.pool())
        .delete_by_user(user.id)
        .await?;
    if !deleted {
        return Err(AppError::NotFound("cart not found".to_owned()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Resolve every line's catalog references in two keyed reads.
///
/// Dangling references expand to `None`; the captured line data is kept.
async fn expand_cart(state: &AppState, cart: Cart) -> Result<CartExpanded> {
    let product_ids: Vec<ProductId> = cart.items.iter().map(|line| line.product).collect();
    let variant_ids: Vec<VariantId> = cart.items.iter().map(|line| line.variant).collect();

    let products = ProductRepository::new(state.pool())
        .get_many(&product_ids)
        .await?;
    let variants = VariantRepository::new(state.pool())
        .get_many(&variant_ids)
        .await?;

    let products: HashMap<ProductId, _> = products
        .into_iter()
        .map(|product| (product.id, product))
        .collect();
    let variants: HashMap<VariantId, _> = variants
        .into_iter()
        .map(|variant| (variant.id, variant))
        .collect();

    let items = cart
        .items
        .into_iter()
        .map(|line: CartLine| CartLineExpanded {
            product: products.get(&line.product).cloned(),
            variant: variants.get(&line.variant).cloned(),
            quantity: line.quantity,
            price: line.price,
        })
        .collect();

    Ok(CartExpanded {
        id: cart.id,
        user_id: cart.user_id,
        items,
        total_amount: cart.total_amount,
        created_at: cart.created_at,
        updated_at: cart.updated_at,
    })
}
