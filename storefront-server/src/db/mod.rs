//! Catalog storage
//!
//! [`CatalogStore`] is the only seam between the services and persistence.
//! Every method is a point read or a point write; there are no multi-entity
//! transactions beyond what a single method documents.
//!
//! - [`memory::MemoryStore`]: in-process maps, used for development and tests
//! - [`postgres::PgStore`]: PostgreSQL via sqlx

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use std::collections::HashMap;

use async_trait::async_trait;
use shared::catalog::{CatalogError, Resource};
use shared::models::{Category, Product};
use thiserror::Error;

/// Storage error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{resource} {id} not found")]
    NotFound { resource: Resource, id: i64 },

    #[error("Duplicate {resource}: {key}")]
    Duplicate { resource: Resource, key: String },

    #[error("Database error: {0}")]
    Database(String),
}

impl StoreError {
    pub fn category_not_found(id: i64) -> Self {
        Self::NotFound {
            resource: Resource::Category,
            id,
        }
    }

    pub fn product_not_found(id: i64) -> Self {
        Self::NotFound {
            resource: Resource::Product,
            id,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::Database(err.to_string())
    }
}

impl From<StoreError> for CatalogError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { resource, id } => CatalogError::NotFound {
                resource,
                key: id.to_string(),
            },
            StoreError::Duplicate { resource, key } => CatalogError::SlugTaken {
                resource,
                slug: key,
            },
            StoreError::Database(msg) => CatalogError::Store(msg),
        }
    }
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence operations for categories, products and their assignments
///
/// Listing order is by id, which for snowflake ids is creation order.
/// Product reads always carry the product's current `category_ids`.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    // ── Categories ─────────────────────────────────────────────────

    async fn list_categories(&self) -> StoreResult<Vec<Category>>;

    async fn find_category(&self, id: i64) -> StoreResult<Option<Category>>;

    async fn find_category_by_slug(&self, slug: &str) -> StoreResult<Option<Category>>;

    /// Fails with `Duplicate` when the slug is taken
    async fn insert_category(&self, category: &Category) -> StoreResult<()>;

    /// Replace a stored category. Fails with `NotFound` or `Duplicate`.
    async fn update_category(&self, category: &Category) -> StoreResult<()>;

    /// Delete a category, detach it from every product and turn its direct
    /// children into roots. Returns `false` when it did not exist.
    async fn delete_category(&self, id: i64) -> StoreResult<bool>;

    // ── Products ───────────────────────────────────────────────────

    async fn list_products(&self) -> StoreResult<Vec<Product>>;

    async fn find_product(&self, id: i64) -> StoreResult<Option<Product>>;

    async fn find_product_by_slug(&self, slug: &str) -> StoreResult<Option<Product>>;

    /// Insert a product together with its `category_ids`
    async fn insert_product(&self, product: &Product) -> StoreResult<()>;

    /// Replace a stored product, including its `category_ids`
    async fn update_product(&self, product: &Product) -> StoreResult<()>;

    async fn delete_product(&self, id: i64) -> StoreResult<bool>;

    // ── Assignments ────────────────────────────────────────────────

    /// Idempotent. Returns `true` when the assignment was newly created.
    async fn add_product_category(&self, product_id: i64, category_id: i64) -> StoreResult<bool>;

    /// Idempotent. Returns `true` when an assignment was removed.
    async fn remove_product_category(&self, product_id: i64, category_id: i64)
    -> StoreResult<bool>;

    /// Number of products directly carrying each category, in one read.
    /// Categories without products are absent from the map.
    async fn category_product_counts(&self) -> StoreResult<HashMap<i64, u64>>;
}
