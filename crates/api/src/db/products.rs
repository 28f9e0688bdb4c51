//! Product repository.
//!
//! Reads come back expanded: category and sub-category are joined in,
//! replacing the document-store lookup pipeline with LEFT JOINs.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;

use juniper_core::{CategoryId, ProductId, SubCategoryId};

use super::RepositoryError;
use crate::models::catalog::{Category, Product, ProductExpanded, SubCategory};

const PRODUCT_COLUMNS: &str = "id, name, slug, short_desc, brand, is_featured, status, \
     thumbnail, attributes, category_id, sub_category_id, created_at, updated_at";

const EXPANDED_SELECT: &str = "SELECT \
         p.id, p.name, p.slug, p.short_desc, p.brand, p.is_featured, p.status, \
         p.thumbnail, p.attributes, p.category_id, p.sub_category_id, \
         p.created_at, p.updated_at, \
         c.id AS c_id, c.name AS c_name, c.thumbnail AS c_thumbnail, \
         c.created_at AS c_created_at, c.updated_at AS c_updated_at, \
         s.id AS s_id, s.name AS s_name, s.thumbnail AS s_thumbnail, \
         s.category_id AS s_category_id, \
         s.created_at AS s_created_at, s.updated_at AS s_updated_at \
     FROM products p \
     LEFT JOIN categories c ON c.id = p.category_id \
     LEFT JOIN sub_categories s ON s.id = p.sub_category_id";

/// Data for inserting a new product.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub slug: Option<String>,
    pub short_desc: Option<String>,
    pub brand: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    pub status: Option<String>,
    pub thumbnail: Option<String>,
    pub attributes: Option<serde_json::Value>,
    pub category_id: Option<CategoryId>,
    pub sub_category_id: Option<SubCategoryId>,
}

/// Partial product update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub short_desc: Option<String>,
    pub brand: Option<String>,
    pub is_featured: Option<bool>,
    pub status: Option<String>,
    pub thumbnail: Option<String>,
    pub attributes: Option<serde_json::Value>,
    pub category_id: Option<CategoryId>,
    pub sub_category_id: Option<SubCategoryId>,
}

/// A product row joined with its category and sub-category.
#[derive(sqlx::FromRow)]
struct ProductExpandedRow {
    id: i32,
    name: String,
    slug: Option<String>,
    short_desc: Option<String>,
    brand: Option<String>,
    is_featured: bool,
    status: String,
    thumbnail: Option<String>,
    attributes: serde_json::Value,
    category_id: Option<CategoryId>,
    sub_category_id: Option<SubCategoryId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    c_id: Option<i32>,
    c_name: Option<String>,
    c_thumbnail: Option<String>,
    c_created_at: Option<DateTime<Utc>>,
    c_updated_at: Option<DateTime<Utc>>,
    s_id: Option<i32>,
    s_name: Option<String>,
    s_thumbnail: Option<String>,
    s_category_id: Option<CategoryId>,
    s_created_at: Option<DateTime<Utc>>,
    s_updated_at: Option<DateTime<Utc>>,
}

impl ProductExpandedRow {
    fn into_expanded(self) -> ProductExpanded {
        let category = match (self.c_id, self.c_name, self.c_created_at, self.c_updated_at) {
            (Some(id), Some(name), Some(created_at), Some(updated_at)) => Some(Category {
                id: CategoryId::new(id),
                name,
                thumbnail: self.c_thumbnail,
                created_at,
                updated_at,
            }),
            _ => None,
        };

        let sub_category = match (self.s_id, self.s_name, self.s_created_at, self.s_updated_at) {
            (Some(id), Some(name), Some(created_at), Some(updated_at)) => Some(SubCategory {
                id: SubCategoryId::new(id),
                name,
                thumbnail: self.s_thumbnail,
                category_id: self.s_category_id,
                created_at,
                updated_at,
            }),
            _ => None,
        };

        ProductExpanded {
            product: Product {
                id: ProductId::new(self.id),
                name: self.name,
                slug: self.slug,
                short_desc: self.short_desc,
                brand: self.brand,
                is_featured: self.is_featured,
                status: self.status,
                thumbnail: self.thumbnail,
                attributes: self.attributes,
                category_id: self.category_id,
                sub_category_id: self.sub_category_id,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            category,
            sub_category,
        }
    }
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, new: &NewProduct) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO products \
                 (name, slug, short_desc, brand, is_featured, status, thumbnail, attributes, \
                  category_id, sub_category_id) \
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, 'active'), $7, COALESCE($8, '{{}}'::jsonb), $9, $10) \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&new.name)
        .bind(new.slug.as_ref())
        .bind(new.short_desc.as_ref())
        .bind(new.brand.as_ref())
        .bind(new.is_featured)
        .bind(new.status.as_ref())
        .bind(new.thumbnail.as_ref())
        .bind(new.attributes.as_ref())
        .bind(new.category_id)
        .bind(new.sub_category_id)
        .fetch_one(self.pool)
        .await?;

        Ok(product)
    }

    /// Get a product by ID, with category and sub-category joined in.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id_expanded(
        &self,
        id: ProductId,
    ) -> Result<Option<ProductExpanded>, RepositoryError> {
        let row =
            sqlx::query_as::<_, ProductExpandedRow>(&format!("{EXPANDED_SELECT} WHERE p.id = $1"))
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        Ok(row.map(ProductExpandedRow::into_expanded))
    }

    /// List all products, expanded.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_expanded(&self) -> Result<Vec<ProductExpanded>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductExpandedRow>(&format!(
            "{EXPANDED_SELECT} ORDER BY p.created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(ProductExpandedRow::into_expanded)
            .collect())
    }

    /// List products in a category, expanded, most recently updated first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_category_expanded(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<ProductExpanded>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductExpandedRow>(&format!(
            "{EXPANDED_SELECT} WHERE p.category_id = $1 ORDER BY p.updated_at DESC"
        ))
        .bind(category_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(ProductExpandedRow::into_expanded)
            .collect())
    }

    /// List products in a sub-category, expanded, most recently updated first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_sub_category_expanded(
        &self,
        sub_category_id: SubCategoryId,
    ) -> Result<Vec<ProductExpanded>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductExpandedRow>(&format!(
            "{EXPANDED_SELECT} WHERE p.sub_category_id = $1 ORDER BY p.updated_at DESC"
        ))
        .bind(sub_category_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(ProductExpandedRow::into_expanded)
            .collect())
    }

    /// Get several products by ID (used to expand cart lines).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_many(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        let raw_ids: Vec<i32> = ids.iter().map(|id| id.as_i32()).collect();
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ANY($1)"
        ))
        .bind(&raw_ids)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Apply a partial update; `None` fields are left untouched.
    ///
    /// Returns `None` if the product does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(
        &self,
        id: ProductId,
        changes: &ProductChanges,
    ) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "UPDATE products SET \
                 name = COALESCE($2, name), \
                 slug = COALESCE($3, slug), \
                 short_desc = COALESCE($4, short_desc), \
                 brand = COALESCE($5, brand), \
                 is_featured = COALESCE($6, is_featured), \
                 status = COALESCE($7, status), \
                 thumbnail = COALESCE($8, thumbnail), \
                 attributes = COALESCE($9, attributes), \
                 category_id = COALESCE($10, category_id), \
                 sub_category_id = COALESCE($11, sub_category_id), \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .bind(changes.name.as_ref())
        .bind(changes.slug.as_ref())
        .bind(changes.short_desc.as_ref())
        .bind(changes.brand.as_ref())
        .bind(changes.is_featured)
        .bind(changes.status.as_ref())
        .bind(changes.thumbnail.as_ref())
        .bind(changes.attributes.as_ref())
        .bind(changes.category_id)
        .bind(changes.sub_category_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Delete a product. Returns `false` if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete several products at once, returning how many went away.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_many(&self, ids: &[ProductId]) -> Result<u64, RepositoryError> {
        let raw_ids: Vec<i32> = ids.iter().map(|id| id.as_i32()).collect();
        let result = sqlx::query("DELETE FROM products WHERE id = ANY($1)")
            .bind(&raw_ids)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
