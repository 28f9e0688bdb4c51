//! Cart repository.
//!
//! One row per user. Line items are a JSONB document on the row, so every
//! mutation below is a single-row atomic write; concurrent edits to the same
//! cart resolve as last-write-wins, which is acceptable because a cart has
//! exactly one owner.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;

use juniper_core::{CartId, UserId};

use super::RepositoryError;
use crate::models::cart::{Cart, CartLine};

const CART_COLUMNS: &str = "id, user_id, items, total_amount, created_at, updated_at";

/// Raw `carts` row.
#[derive(sqlx::FromRow)]
struct CartRow {
    id: i32,
    user_id: i32,
    items: Json<Vec<CartLine>>,
    total_amount: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CartRow {
    fn into_cart(self) -> Cart {
        Cart {
            id: CartId::new(self.id),
            user_id: UserId::new(self.user_id),
            items: self.items.0,
            total_amount: self.total_amount,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the cart owned by a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_user(&self, user_id: UserId) -> Result<Option<Cart>, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(&format!(
            "SELECT {CART_COLUMNS} FROM carts WHERE user_id = $1"
        ))
        .bind(user_id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(CartRow::into_cart))
    }

    /// Write the full line set and its freshly computed total, creating the
    /// cart row if the user has none yet. A single-row upsert.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn put(
        &self,
        user_id: UserId,
        items: &[CartLine],
        total_amount: Decimal,
    ) -> Result<Cart, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(&format!(
            "INSERT INTO carts (user_id, items, total_amount) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (user_id) DO UPDATE \
                 SET items = EXCLUDED.items, \
                     total_amount = EXCLUDED.total_amount, \
                     updated_at = now() \
             RETURNING {CART_COLUMNS}"
        ))
        .bind(user_id.as_i32())
        .bind(Json(items))
        .bind(total_amount)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into_cart())
    }

    /// Delete a user's cart entirely. Returns `false` if there was none.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_by_user(&self, user_id: UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM carts WHERE user_id = $1")
            .bind(user_id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
