//! Product-variant repository.

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use sqlx::types::Json;

use juniper_core::{ProductId, VariantId};

use super::RepositoryError;
use crate::models::catalog::ProductVariant;

const VARIANT_COLUMNS: &str = "id, product_id, color, size, weight, stock, price, \
     thumbnail, photos, created_at, updated_at";

/// Data for inserting a new variant.
#[derive(Debug, Clone, Deserialize)]
pub struct NewVariant {
    pub product_id: ProductId,
    pub color: Option<String>,
    pub size: Option<String>,
    pub weight: Option<Decimal>,
    #[serde(default)]
    pub stock: i32,
    pub price: Decimal,
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub photos: Vec<String>,
}

/// Partial variant update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VariantChanges {
    pub color: Option<String>,
    pub size: Option<String>,
    pub weight: Option<Decimal>,
    pub stock: Option<i32>,
    pub price: Option<Decimal>,
    pub thumbnail: Option<String>,
    pub photos: Option<Vec<String>>,
}

/// Repository for product-variant database operations.
pub struct VariantRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> VariantRepository<'a> {
    /// Create a new variant repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new variant.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails (including a
    /// missing parent product, surfaced as a foreign-key violation).
    pub async fn create(&self, new: &NewVariant) -> Result<ProductVariant, RepositoryError> {
        let variant = sqlx::query_as::<_, ProductVariant>(&format!(
            "INSERT INTO product_variants \
                 (product_id, color, size, weight, stock, price, thumbnail, photos) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {VARIANT_COLUMNS}"
        ))
        .bind(new.product_id)
        .bind(new.color.as_ref())
        .bind(new.size.as_ref())
        .bind(new.weight)
        .bind(new.stock)
        .bind(new.price)
        .bind(new.thumbnail.as_ref())
        .bind(Json(&new.photos))
        .fetch_one(self.pool)
        .await?;

        Ok(variant)
    }

    /// Get a variant by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: VariantId) -> Result<Option<ProductVariant>, RepositoryError> {
        let variant = sqlx::query_as::<_, ProductVariant>(&format!(
            "SELECT {VARIANT_COLUMNS} FROM product_variants WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(variant)
    }

    /// List every variant of a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<ProductVariant>, RepositoryError> {
        let variants = sqlx::query_as::<_, ProductVariant>(&format!(
            "SELECT {VARIANT_COLUMNS} FROM product_variants \
             WHERE product_id = $1 ORDER BY created_at"
        ))
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        Ok(variants)
    }

    /// Get several variants by ID (used to expand cart lines).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_many(&self, ids: &[VariantId]) -> Result<Vec<ProductVariant>, RepositoryError> {
        let raw_ids: Vec<i32> = ids.iter().map(|id| id.as_i32()).collect();
        let variants = sqlx::query_as::<_, ProductVariant>(&format!(
            "SELECT {VARIANT_COLUMNS} FROM product_variants WHERE id = ANY($1)"
        ))
        .bind(&raw_ids)
        .fetch_all(self.pool)
        .await?;

        Ok(variants)
    }

    /// Apply a partial update; `None` fields are left untouched.
    ///
    /// Returns `None` if the variant does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(
        &self,
        id: VariantId,
        changes: &VariantChanges,
    ) -> Result<Option<ProductVariant>, RepositoryError> {
        let variant = sqlx::query_as::<_, ProductVariant>(&format!(
            "UPDATE product_variants SET \
                 color = COALESCE($2, color), \
                 size = COALESCE($3, size), \
                 weight = COALESCE($4, weight), \
                 stock = COALESCE($5, stock), \
                 price = COALESCE($6, price), \
                 thumbnail = COALESCE($7, thumbnail), \
                 photos = COALESCE($8, photos), \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {VARIANT_COLUMNS}"
        ))
        .bind(id)
        .bind(changes.color.as_ref())
        .bind(changes.size.as_ref())
        .bind(changes.weight)
        .bind(changes.stock)
        .bind(changes.price)
        .bind(changes.thumbnail.as_ref())
        .bind(changes.photos.as_ref().map(Json))
        .fetch_optional(self.pool)
        .await?;

        Ok(variant)
    }

    /// Delete a variant. Returns `false` if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: VariantId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM product_variants WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
