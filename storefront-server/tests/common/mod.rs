//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use shared::models::{Category, Product};
use storefront_server::db::{CatalogStore, MemoryStore, StoreError, StoreResult};
use storefront_server::{Config, ServerState};

pub fn category(id: i64, slug: &str, parent_id: Option<i64>) -> Category {
    Category {
        id,
        name: slug.replace('-', " "),
        slug: slug.to_string(),
        parent_id,
        image: None,
        description: None,
        created_at: id,
        updated_at: id,
    }
}

pub fn product(id: i64, slug: &str, price_cents: i64, category_ids: &[i64]) -> Product {
    Product {
        id,
        name: slug.replace('-', " "),
        slug: slug.to_string(),
        description: String::new(),
        price: Decimal::new(price_cents, 2),
        compare_at_price: None,
        images: vec![],
        category_ids: category_ids.to_vec(),
        tags: vec![],
        inventory: 10,
        seo_title: String::new(),
        seo_description: String::new(),
        status: Default::default(),
        is_featured: false,
        created_at: id,
        updated_at: id,
    }
}

pub fn state_with(store: Arc<dyn CatalogStore>) -> ServerState {
    ServerState::with_store(Config::default(), store)
}

/// Sorted category ids carried by a product
pub async fn categories_of(store: &dyn CatalogStore, product_id: i64) -> Vec<i64> {
    let mut ids = store
        .find_product(product_id)
        .await
        .unwrap()
        .unwrap()
        .category_ids;
    ids.sort_unstable();
    ids
}

/// Wraps a [`MemoryStore`], failing assignment writes for selected products
/// and counting every assignment write attempt.
#[derive(Clone)]
pub struct FlakyStore {
    inner: MemoryStore,
    failing: Arc<Mutex<HashSet<i64>>>,
    writes: Arc<AtomicUsize>,
}

impl FlakyStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            failing: Arc::default(),
            writes: Arc::default(),
        }
    }

    pub fn fail_for(&self, product_id: i64) {
        self.failing.lock().insert(product_id);
    }

    pub fn heal(&self) {
        self.failing.lock().clear();
    }

    pub fn assignment_writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check(&self, product_id: i64) -> StoreResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.failing.lock().contains(&product_id) {
            return Err(StoreError::Database(format!(
                "injected failure for product {product_id}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogStore for FlakyStore {
    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        self.inner.list_categories().await
    }

    async fn find_category(&self, id: i64) -> StoreResult<Option<Category>> {
        self.inner.find_category(id).await
    }

    async fn find_category_by_slug(&self, slug: &str) -> StoreResult<Option<Category>> {
        self.inner.find_category_by_slug(slug).await
    }

    async fn insert_category(&self, category: &Category) -> StoreResult<()> {
        self.inner.insert_category(category).await
    }

    async fn update_category(&self, category: &Category) -> StoreResult<()> {
        self.inner.update_category(category).await
    }

    async fn delete_category(&self, id: i64) -> StoreResult<bool> {
        self.inner.delete_category(id).await
    }

    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        self.inner.list_products().await
    }

    async fn find_product(&self, id: i64) -> StoreResult<Option<Product>> {
        self.inner.find_product(id).await
    }

    async fn find_product_by_slug(&self, slug: &str) -> StoreResult<Option<Product>> {
        self.inner.find_product_by_slug(slug).await
    }

    async fn insert_product(&self, product: &Product) -> StoreResult<()> {
        self.inner.insert_product(product).await
    }

    async fn update_product(&self, product: &Product) -> StoreResult<()> {
        self.inner.update_product(product).await
    }

    async fn delete_product(&self, id: i64) -> StoreResult<bool> {
        self.inner.delete_product(id).await
    }

    async fn add_product_category(&self, product_id: i64, category_id: i64) -> StoreResult<bool> {
        self.check(product_id)?;
        self.inner.add_product_category(product_id, category_id).await
    }

    async fn remove_product_category(
        &self,
        product_id: i64,
        category_id: i64,
    ) -> StoreResult<bool> {
        self.check(product_id)?;
        self.inner
            .remove_product_category(product_id, category_id)
            .await
    }

    async fn category_product_counts(&self) -> StoreResult<HashMap<i64, u64>> {
        self.inner.category_product_counts().await
    }
}
