//! Sub-category repository.

use sqlx::PgPool;

use juniper_core::{CategoryId, SubCategoryId};

use super::RepositoryError;
use crate::models::catalog::SubCategory;

const SUB_CATEGORY_COLUMNS: &str = "id, name, thumbnail, category_id, created_at, updated_at";

/// A single entry in a bulk sub-category update.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct SubCategoryUpdate {
    pub id: SubCategoryId,
    pub name: Option<String>,
    pub thumbnail: Option<String>,
    pub category_id: Option<CategoryId>,
}

/// Repository for sub-category database operations.
pub struct SubCategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SubCategoryRepository<'a> {
    /// Create a new sub-category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new sub-category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        name: &str,
        thumbnail: Option<&str>,
        category_id: CategoryId,
    ) -> Result<SubCategory, RepositoryError> {
        let sub_category = sqlx::query_as::<_, SubCategory>(&format!(
            "INSERT INTO sub_categories (name, thumbnail, category_id) VALUES ($1, $2, $3) \
             RETURNING {SUB_CATEGORY_COLUMNS}"
        ))
        .bind(name)
        .bind(thumbnail)
        .bind(category_id)
        .fetch_one(self.pool)
        .await?;

        Ok(sub_category)
    }

    /// Get a sub-category by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(
        &self,
        id: SubCategoryId,
    ) -> Result<Option<SubCategory>, RepositoryError> {
        let sub_category = sqlx::query_as::<_, SubCategory>(&format!(
            "SELECT {SUB_CATEGORY_COLUMNS} FROM sub_categories WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(sub_category)
    }

    /// List all sub-categories, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<SubCategory>, RepositoryError> {
        let sub_categories = sqlx::query_as::<_, SubCategory>(&format!(
            "SELECT {SUB_CATEGORY_COLUMNS} FROM sub_categories ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(sub_categories)
    }

    /// List sub-categories belonging to a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<SubCategory>, RepositoryError> {
        let sub_categories = sqlx::query_as::<_, SubCategory>(&format!(
            "SELECT {SUB_CATEGORY_COLUMNS} FROM sub_categories \
             WHERE category_id = $1 ORDER BY created_at DESC"
        ))
        .bind(category_id)
        .fetch_all(self.pool)
        .await?;

        Ok(sub_categories)
    }

    /// Apply a partial update; `None` fields are left untouched.
    ///
    /// Returns `None` if the sub-category does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(
        &self,
        id: SubCategoryId,
        name: Option<&str>,
        thumbnail: Option<&str>,
        category_id: Option<CategoryId>,
    ) -> Result<Option<SubCategory>, RepositoryError> {
        let sub_category = sqlx::query_as::<_, SubCategory>(&format!(
            "UPDATE sub_categories SET \
                 name = COALESCE($2, name), \
                 thumbnail = COALESCE($3, thumbnail), \
                 category_id = COALESCE($4, category_id), \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {SUB_CATEGORY_COLUMNS}"
        ))
        .bind(id)
        .bind(name)
        .bind(thumbnail)
        .bind(category_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(sub_category)
    }

    /// Apply several partial updates, returning the updated rows.
    ///
    /// Missing IDs are skipped rather than failing the whole batch.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn update_many(
        &self,
        updates: &[SubCategoryUpdate],
    ) -> Result<Vec<SubCategory>, RepositoryError> {
        let mut updated = Vec::with_capacity(updates.len());
        for change in updates {
            if let Some(sub_category) = self
                .update(
                    change.id,
                    change.name.as_deref(),
                    change.thumbnail.as_deref(),
                    change.category_id,
                )
                .await?
            {
                updated.push(sub_category);
            }
        }
        Ok(updated)
    }

    /// Delete a sub-category. Returns `false` if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: SubCategoryId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM sub_categories WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete several sub-categories at once, returning how many went away.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_many(&self, ids: &[SubCategoryId]) -> Result<u64, RepositoryError> {
        let raw_ids: Vec<i32> = ids.iter().map(|id| id.as_i32()).collect();
        let result = sqlx::query("DELETE FROM sub_categories WHERE id = ANY($1)")
            .bind(&raw_ids)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Count all sub-categories.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM sub_categories")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }
}
