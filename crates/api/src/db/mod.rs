//! Database operations for the Juniper `PostgreSQL` store.
//!
//! # Tables
//!
//! - `users` - Accounts, hashed credentials, and the single live refresh-token
//!   reference per user
//! - `categories` / `sub_categories` - Catalog taxonomy
//! - `products` / `product_variants` - Catalog items
//! - `carts` - One row per user; line items live in a JSONB column so every
//!   cart mutation is a single-row write
//!
//! # Migrations
//!
//! Migrations are embedded from `crates/api/migrations/` and run at startup
//! via [`MIGRATOR`].

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub mod carts;
pub mod categories;
pub mod products;
pub mod subcategories;
pub mod users;
pub mod variants;

/// Embedded database migrations.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

/// Errors surfaced by the repository layer.
///
/// Lookup misses are `Ok(None)`, not errors; callers decide whether a miss is
/// a client error.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying database failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Unique constraint violated (e.g. duplicate email).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A stored value failed to parse back into its domain type.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
