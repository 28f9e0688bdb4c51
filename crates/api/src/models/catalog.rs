//! Catalog models: categories, sub-categories, products, and variants.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use juniper_core::{CategoryId, ProductId, SubCategoryId, VariantId};

/// Top-level catalog grouping.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub thumbnail: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Second-level catalog grouping, optionally attached to a category.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SubCategory {
    pub id: SubCategoryId,
    pub name: String,
    pub thumbnail: Option<String>,
    pub category_id: Option<CategoryId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A catalog product. Pricing and stock live on its variants.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub slug: Option<String>,
    pub short_desc: Option<String>,
    pub brand: Option<String>,
    pub is_featured: bool,
    pub status: String,
    pub thumbnail: Option<String>,
    pub attributes: serde_json::Value,
    pub category_id: Option<CategoryId>,
    pub sub_category_id: Option<SubCategoryId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A product with its category and sub-category joined in.
#[derive(Debug, Clone, Serialize)]
pub struct ProductExpanded {
    #[serde(flatten)]
    pub product: Product,
    pub category: Option<Category>,
    pub sub_category: Option<SubCategory>,
}

/// A purchasable variant of a product.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProductVariant {
    pub id: VariantId,
    pub product_id: ProductId,
    pub color: Option<String>,
    pub size: Option<String>,
    pub weight: Option<Decimal>,
    pub stock: i32,
    pub price: Decimal,
    pub thumbnail: Option<String>,
    #[sqlx(json)]
    pub photos: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
