//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Liveness check
//! GET  /health/ready               - Readiness check (database ping)
//!
//! # Accounts (/api/v1/user)
//! POST /register                   - Create an account
//! POST /login                      - Password login, returns token pair
//! POST /refresh-token              - Exchange refresh token for a new pair
//! POST /logout              (auth) - Clear the refresh reference
//! GET  /profile             (auth) - Current user
//! PUT  /profile             (auth) - Partial profile update
//! PUT  /change-password     (auth) - Verify old, set new
//! POST /forgot-password            - Email a reset link
//! POST /reset-password             - Complete a reset with a reset token
//!
//! # Catalog (/api/v1/categories, /api/v1/sub-categories,
//! #          /api/v1/products, /api/v1/product-variants)
//! CRUD + list/count/by-parent lookups; products come back with their
//! category and sub-category joined in.
//!
//! # Cart (/api/v1/cart)
//! POST   /items             (auth) - Add or merge a line
//! PUT    /items             (auth) - Overwrite a line's quantity
//! DELETE /items             (auth) - Remove a line (no-op when absent)
//! GET    /                  (auth) - Cart with lines expanded
//! DELETE /                  (auth) - Delete the cart entirely
//! ```

pub mod cart;
pub mod categories;
pub mod products;
pub mod subcategories;
pub mod users;
pub mod variants;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the account routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(users::register))
        .route("/login", post(users::login))
        .route("/refresh-token", post(users::renew))
        .route("/logout", post(users::logout))
        .route("/profile", get(users::get_profile).put(users::update_profile))
        .route("/change-password", put(users::change_password))
        .route("/forgot-password", post(users::forgot_password))
        .route("/reset-password", post(users::reset_password))
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(categories::create).get(categories::list))
        .route("/count", get(categories::count))
        .route(
            "/{id}",
            get(categories::get)
                .put(categories::update)
                .delete(categories::delete),
        )
}

/// Create the sub-category routes router.
pub fn sub_category_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(subcategories::create)
                .get(subcategories::list)
                .put(subcategories::update_many)
                .delete(subcategories::delete_many),
        )
        .route("/count", get(subcategories::count))
        .route(
            "/{id}",
            get(subcategories::get)
                .put(subcategories::update)
                .delete(subcategories::delete),
        )
        .route(
            "/by-category/{id}",
            get(subcategories::list_by_category),
        )
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(products::create)
                .get(products::list)
                .delete(products::delete_many),
        )
        .route(
            "/{id}",
            get(products::get)
                .put(products::update)
                .delete(products::delete),
        )
        .route("/by-category/{id}", get(products::list_by_category))
        .route(
            "/by-sub-category/{id}",
            get(products::list_by_sub_category),
        )
}

/// Create the product-variant routes router.
pub fn variant_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(variants::create))
        .route(
            "/{id}",
            get(variants::get)
                .put(variants::update)
                .delete(variants::delete),
        )
        .route("/by-product/{id}", get(variants::list_by_product))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::get_cart).delete(cart::clear_cart))
        .route(
            "/items",
            post(cart::add_item)
                .put(cart::set_item_quantity)
                .delete(cart::remove_item),
        )
}

/// Create all routes for the API, mounted under `/api/v1`.
pub fn routes() -> Router<AppState> {
    let v1 = Router::new()
        .nest("/user", user_routes())
        .nest("/categories", category_routes())
        .nest("/sub-categories", sub_category_routes())
        .nest("/products", product_routes())
        .nest("/product-variants", variant_routes())
        .nest("/cart", cart_routes());

    Router::new().nest("/api/v1", v1)
}
