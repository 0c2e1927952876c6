//! Product management and storefront listing
//!
//! Listing reads a fresh snapshot from the store on every call. A category
//! filter matches products carrying the category itself or any of its
//! descendants; assignments themselves never imply ancestry.

use std::cmp::Reverse;
use std::collections::HashSet;
use std::sync::Arc;

use shared::catalog::{CatalogError, CatalogResult, CategoryIndex};
use shared::models::{Product, ProductCreate, ProductQuery, ProductSort, ProductUpdate};
use shared::util::{now_millis, slugify, snowflake_id};

use crate::db::CatalogStore;
use crate::utils::validation::{
    MAX_DESCRIPTION_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SEO_TITLE_LEN, validate_max_len,
    validate_price, validate_required_text, validate_slug, validate_tags, validate_urls,
};

#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn CatalogStore>,
}

impl ProductService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Storefront listing
    ///
    /// `category` is an id or a slug. An unknown reference applies no
    /// category filter.
    pub async fn list(&self, query: &ProductQuery) -> CatalogResult<Vec<Product>> {
        let mut products = self.store.list_products().await?;

        if let Some(reference) = query.category.as_deref().filter(|r| !r.trim().is_empty()) {
            let categories = self.store.list_categories().await?;
            let index = CategoryIndex::new(&categories);
            match index.find_by_ref(reference) {
                Some(category) => {
                    let wanted = index.descendant_ids(category.id);
                    products.retain(|p| p.category_ids.iter().any(|c| wanted.contains(c)));
                }
                None => {
                    tracing::debug!(category = %reference, "Unknown category filter ignored");
                }
            }
        }

        if query.featured == Some(true) {
            products.retain(|p| p.is_featured);
        }

        sort_products(&mut products, query.sort.unwrap_or_default());

        if let Some(limit) = query.limit {
            products.truncate(limit);
        }

        Ok(products)
    }

    pub async fn get(&self, id: i64) -> CatalogResult<Product> {
        self.store
            .find_product(id)
            .await?
            .ok_or_else(|| CatalogError::product_not_found(id))
    }

    pub async fn create(&self, payload: ProductCreate) -> CatalogResult<Product> {
        let slug = resolve_slug(payload.slug.as_deref(), &payload.name);
        let category_ids = unique_ids(payload.category_ids);
        let now = now_millis();

        let product = Product {
            id: snowflake_id(),
            name: payload.name.trim().to_string(),
            slug,
            description: payload.description.unwrap_or_default(),
            price: payload.price,
            compare_at_price: payload.compare_at_price,
            images: payload.images,
            category_ids,
            tags: payload.tags,
            inventory: payload.inventory.unwrap_or(0),
            seo_title: payload.seo_title.unwrap_or_default(),
            seo_description: payload.seo_description.unwrap_or_default(),
            status: payload.status.unwrap_or_default(),
            is_featured: payload.is_featured.unwrap_or(false),
            created_at: now,
            updated_at: now,
        };

        validate_product(&product)?;
        self.ensure_categories_exist(&product.category_ids).await?;
        self.store.insert_product(&product).await?;

        tracing::info!(product_id = product.id, slug = %product.slug, "Product created");
        Ok(product)
    }

    pub async fn update(&self, id: i64, payload: ProductUpdate) -> CatalogResult<Product> {
        let mut product = self.get(id).await?;

        if let Some(name) = payload.name {
            product.name = name.trim().to_string();
        }
        if let Some(slug) = payload.slug {
            product.slug = resolve_slug(Some(&slug), &product.name);
        }
        if let Some(description) = payload.description {
            product.description = description;
        }
        if let Some(price) = payload.price {
            product.price = price;
        }
        if let Some(compare_at_price) = payload.compare_at_price {
            product.compare_at_price = compare_at_price;
        }
        if let Some(images) = payload.images {
            product.images = images;
        }
        let categories_changed = payload.category_ids.is_some();
        if let Some(category_ids) = payload.category_ids {
            product.category_ids = unique_ids(category_ids);
        }
        if let Some(tags) = payload.tags {
            product.tags = tags;
        }
        if let Some(inventory) = payload.inventory {
            product.inventory = inventory;
        }
        if let Some(seo_title) = payload.seo_title {
            product.seo_title = seo_title;
        }
        if let Some(seo_description) = payload.seo_description {
            product.seo_description = seo_description;
        }
        if let Some(status) = payload.status {
            product.status = status;
        }
        if let Some(is_featured) = payload.is_featured {
            product.is_featured = is_featured;
        }
        product.updated_at = now_millis();

        validate_product(&product)?;
        if categories_changed {
            self.ensure_categories_exist(&product.category_ids).await?;
        }
        self.store.update_product(&product).await?;

        tracing::info!(product_id = id, "Product updated");
        Ok(product)
    }

    pub async fn delete(&self, id: i64) -> CatalogResult<()> {
        if !self.store.delete_product(id).await? {
            return Err(CatalogError::product_not_found(id));
        }
        tracing::info!(product_id = id, "Product deleted");
        Ok(())
    }

    async fn ensure_categories_exist(&self, category_ids: &[i64]) -> CatalogResult<()> {
        if category_ids.is_empty() {
            return Ok(());
        }
        let categories = self.store.list_categories().await?;
        let index = CategoryIndex::new(&categories);
        match category_ids.iter().find(|id| !index.contains(**id)) {
            Some(missing) => Err(CatalogError::category_not_found(*missing)),
            None => Ok(()),
        }
    }
}

/// Explicit slug if non-blank, otherwise derived from the name
pub(crate) fn resolve_slug(explicit: Option<&str>, name: &str) -> String {
    match explicit.map(str::trim).filter(|s| !s.is_empty()) {
        Some(slug) => slug.to_string(),
        None => slugify(name),
    }
}

/// Collapse duplicates, keeping first-seen order
pub(crate) fn unique_ids(ids: Vec<i64>) -> Vec<i64> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

pub(crate) fn validate_product(product: &Product) -> CatalogResult<()> {
    validate_required_text(&product.name, "name", MAX_NAME_LEN)?;
    validate_slug(&product.slug, "slug")?;
    validate_max_len(&product.description, "description", MAX_DESCRIPTION_LEN)?;
    validate_price(product.price, "price")?;
    if let Some(compare_at_price) = product.compare_at_price {
        validate_price(compare_at_price, "compare_at_price")?;
    }
    validate_urls(&product.images, "image")?;
    validate_tags(&product.tags)?;
    validate_max_len(&product.seo_title, "seo_title", MAX_SEO_TITLE_LEN)?;
    validate_max_len(&product.seo_description, "seo_description", MAX_NOTE_LEN)?;
    if product.inventory < 0 {
        return Err(CatalogError::InvalidInput(
            "inventory must not be negative".to_string(),
        ));
    }
    Ok(())
}

fn sort_products(products: &mut [Product], sort: ProductSort) {
    match sort {
        ProductSort::Newest => products.sort_by_key(|p| (Reverse(p.created_at), Reverse(p.id))),
        ProductSort::PriceAsc => products.sort_by(|a, b| a.price.cmp(&b.price).then(a.id.cmp(&b.id))),
        ProductSort::PriceDesc => {
            products.sort_by(|a, b| b.price.cmp(&a.price).then(a.id.cmp(&b.id)))
        }
    }
}
