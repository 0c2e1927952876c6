//! In-memory catalog store
//!
//! Each method takes the lock once, so every point write is atomic on its
//! own. Nothing spans two calls.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use shared::catalog::Resource;
use shared::models::{Category, Product};

use super::{CatalogStore, StoreError, StoreResult};

#[derive(Debug, Default)]
struct Inner {
    categories: BTreeMap<i64, Category>,
    products: BTreeMap<i64, Product>,
}

impl Inner {
    fn category_slug_taken(&self, slug: &str, except: i64) -> bool {
        self.categories
            .values()
            .any(|c| c.slug == slug && c.id != except)
    }

    fn product_slug_taken(&self, slug: &str, except: i64) -> bool {
        self.products
            .values()
            .any(|p| p.slug == slug && p.id != except)
    }
}

/// Catalog store backed by process memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with the given rows, bypassing all checks
    ///
    /// Lets callers load data that the write path would reject (dangling
    /// parents, parent cycles).
    pub fn with_data(categories: Vec<Category>, products: Vec<Product>) -> Self {
        let inner = Inner {
            categories: categories.into_iter().map(|c| (c.id, c)).collect(),
            products: products
                .into_iter()
                .map(|mut p| {
                    dedup(&mut p.category_ids);
                    (p.id, p)
                })
                .collect(),
        };
        Self {
            inner: Arc::new(RwLock::new(inner)),
        }
    }
}

fn dedup(ids: &mut Vec<i64>) {
    let mut seen = std::collections::HashSet::new();
    ids.retain(|id| seen.insert(*id));
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        Ok(self.inner.read().categories.values().cloned().collect())
    }

    async fn find_category(&self, id: i64) -> StoreResult<Option<Category>> {
        Ok(self.inner.read().categories.get(&id).cloned())
    }

    async fn find_category_by_slug(&self, slug: &str) -> StoreResult<Option<Category>> {
        Ok(self
            .inner
            .read()
            .categories
            .values()
            .find(|c| c.slug == slug)
            .cloned())
    }

    async fn insert_category(&self, category: &Category) -> StoreResult<()> {
        let mut inner = self.inner.write();
        if inner.categories.contains_key(&category.id)
            || inner.category_slug_taken(&category.slug, category.id)
        {
            return Err(StoreError::Duplicate {
                resource: Resource::Category,
                key: category.slug.clone(),
            });
        }
        inner.categories.insert(category.id, category.clone());
        Ok(())
    }

    async fn update_category(&self, category: &Category) -> StoreResult<()> {
        let mut inner = self.inner.write();
        if !inner.categories.contains_key(&category.id) {
            return Err(StoreError::category_not_found(category.id));
        }
        if inner.category_slug_taken(&category.slug, category.id) {
            return Err(StoreError::Duplicate {
                resource: Resource::Category,
                key: category.slug.clone(),
            });
        }
        inner.categories.insert(category.id, category.clone());
        Ok(())
    }

    async fn delete_category(&self, id: i64) -> StoreResult<bool> {
        let mut inner = self.inner.write();
        if inner.categories.remove(&id).is_none() {
            return Ok(false);
        }
        for product in inner.products.values_mut() {
            product.category_ids.retain(|c| *c != id);
        }
        for category in inner.categories.values_mut() {
            if category.parent_id == Some(id) {
                category.parent_id = None;
            }
        }
        Ok(true)
    }

    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        Ok(self.inner.read().products.values().cloned().collect())
    }

    async fn find_product(&self, id: i64) -> StoreResult<Option<Product>> {
        Ok(self.inner.read().products.get(&id).cloned())
    }

    async fn find_product_by_slug(&self, slug: &str) -> StoreResult<Option<Product>> {
        Ok(self
            .inner
            .read()
            .products
            .values()
            .find(|p| p.slug == slug)
            .cloned())
    }

    async fn insert_product(&self, product: &Product) -> StoreResult<()> {
        let mut inner = self.inner.write();
        if inner.products.contains_key(&product.id)
            || inner.product_slug_taken(&product.slug, product.id)
        {
            return Err(StoreError::Duplicate {
                resource: Resource::Product,
                key: product.slug.clone(),
            });
        }
        let mut product = product.clone();
        dedup(&mut product.category_ids);
        inner.products.insert(product.id, product);
        Ok(())
    }

    async fn update_product(&self, product: &Product) -> StoreResult<()> {
        let mut inner = self.inner.write();
        if !inner.products.contains_key(&product.id) {
            return Err(StoreError::product_not_found(product.id));
        }
        if inner.product_slug_taken(&product.slug, product.id) {
            return Err(StoreError::Duplicate {
                resource: Resource::Product,
                key: product.slug.clone(),
            });
        }
        let mut product = product.clone();
        dedup(&mut product.category_ids);
        inner.products.insert(product.id, product);
        Ok(())
    }

    async fn delete_product(&self, id: i64) -> StoreResult<bool> {
        Ok(self.inner.write().products.remove(&id).is_some())
    }

    async fn add_product_category(&self, product_id: i64, category_id: i64) -> StoreResult<bool> {
        let mut inner = self.inner.write();
        if !inner.categories.contains_key(&category_id) {
            return Err(StoreError::category_not_found(category_id));
        }
        let product = inner
            .products
            .get_mut(&product_id)
            .ok_or_else(|| StoreError::product_not_found(product_id))?;
        if product.has_category(category_id) {
            return Ok(false);
        }
        product.category_ids.push(category_id);
        Ok(true)
    }

    async fn remove_product_category(
        &self,
        product_id: i64,
        category_id: i64,
    ) -> StoreResult<bool> {
        let mut inner = self.inner.write();
        let product = inner
            .products
            .get_mut(&product_id)
            .ok_or_else(|| StoreError::product_not_found(product_id))?;
        let before = product.category_ids.len();
        product.category_ids.retain(|c| *c != category_id);
        Ok(product.category_ids.len() != before)
    }

    async fn category_product_counts(&self) -> StoreResult<HashMap<i64, u64>> {
        let inner = self.inner.read();
        let mut counts = HashMap::new();
        for product in inner.products.values() {
            for &category_id in &product.category_ids {
                *counts.entry(category_id).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }
}
