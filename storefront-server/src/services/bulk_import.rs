//! Bulk product import
//!
//! Upserts products by slug. Each record names its category by display name;
//! the name is matched case-insensitively and the category is created when
//! missing. An imported product carries exactly that one category afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use shared::catalog::{CatalogError, CatalogResult};
use shared::models::{
    Category, ImportAction, ImportOutcome, ImportProduct, ImportReport, Product,
};
use shared::util::{now_millis, slugify, snowflake_id};

use crate::db::CatalogStore;
use crate::utils::validation::{
    MAX_IMPORT_PRODUCTS, MAX_NAME_LEN, validate_price, validate_required_text,
};

use super::product_service::validate_product;
use super::shopify_csv::parse_shopify_csv;

#[derive(Clone)]
pub struct BulkImportService {
    store: Arc<dyn CatalogStore>,
    placeholder_image: String,
}

impl BulkImportService {
    pub fn new(store: Arc<dyn CatalogStore>, placeholder_image: impl Into<String>) -> Self {
        Self {
            store,
            placeholder_image: placeholder_image.into(),
        }
    }

    /// Parse a Shopify CSV export and import it
    pub async fn import_csv(&self, text: &str) -> CatalogResult<ImportReport> {
        let products = parse_shopify_csv(text)?;
        if products.is_empty() {
            return Err(CatalogError::ImportEmpty);
        }
        self.import(products).await
    }

    /// Upsert every record in order
    ///
    /// Every record is turned into a product and validated before the first
    /// write; the first store failure aborts the remaining records (earlier
    /// ones stay imported).
    pub async fn import(&self, records: Vec<ImportProduct>) -> CatalogResult<ImportReport> {
        if records.len() > MAX_IMPORT_PRODUCTS {
            return Err(CatalogError::InvalidInput(format!(
                "too many products ({}, max {MAX_IMPORT_PRODUCTS})",
                records.len()
            )));
        }

        let mut drafts = Vec::with_capacity(records.len());
        for (i, record) in records.into_iter().enumerate() {
            validate_required_text(&record.name, &format!("products[{i}].name"), MAX_NAME_LEN)?;
            validate_required_text(
                &record.category,
                &format!("products[{i}].category"),
                MAX_NAME_LEN,
            )?;
            validate_price(record.price, &format!("products[{i}].price"))?;
            if record_slug(&record).is_empty() {
                return Err(CatalogError::InvalidInput(format!(
                    "products[{i}] has no usable slug"
                )));
            }

            let draft = self.draft(record);
            validate_product(&draft.product).map_err(|err| match err {
                CatalogError::InvalidInput(msg) => {
                    CatalogError::InvalidInput(format!("products[{i}]: {msg}"))
                }
                other => other,
            })?;
            drafts.push(draft);
        }

        // Stored names may collide case-insensitively; the lowest id wins
        let mut categories: HashMap<String, i64> = HashMap::new();
        for category in self.store.list_categories().await? {
            categories
                .entry(category.name.to_lowercase())
                .or_insert(category.id);
        }

        let mut report = ImportReport::default();

        for Draft { category, product } in drafts {
            let key = category.to_lowercase();
            let category_id = match categories.get(&key) {
                Some(&id) => id,
                None => {
                    let created = self.create_category(&category).await?;
                    report.created_categories.push(created.name);
                    categories.insert(key, created.id);
                    created.id
                }
            };

            let outcome = self.upsert_product(product, category_id).await?;
            report.results.push(outcome);
        }

        report.count = report.results.len();
        tracing::info!(
            count = report.count,
            created_categories = report.created_categories.len(),
            "Bulk import finished"
        );
        Ok(report)
    }

    /// The product a record imports as, before its category is resolved
    fn draft(&self, record: ImportProduct) -> Draft {
        let slug = record_slug(&record);
        let images = if record.images.is_empty() {
            vec![self.placeholder_image.clone()]
        } else {
            record.images
        };
        let now = now_millis();

        Draft {
            category: record.category.trim().to_string(),
            product: Product {
                id: snowflake_id(),
                name: record.name,
                slug,
                description: record.description,
                price: record.price,
                compare_at_price: record.compare_at_price,
                images,
                category_ids: Vec::new(),
                tags: record.tags,
                inventory: record.inventory,
                seo_title: record.seo_title,
                seo_description: record.seo_description,
                status: record.status,
                is_featured: false,
                created_at: now,
                updated_at: now,
            },
        }
    }

    async fn create_category(&self, name: &str) -> CatalogResult<Category> {
        let base = slugify(name);
        let base = if base.is_empty() { "category".to_string() } else { base };

        // Another category may already own the plain slug under a different name
        let mut slug = base.clone();
        let mut n = 2;
        while self.store.find_category_by_slug(&slug).await?.is_some() {
            slug = format!("{base}-{n}");
            n += 1;
        }

        let now = now_millis();
        let category = Category {
            id: snowflake_id(),
            name: name.to_string(),
            slug,
            parent_id: None,
            image: None,
            description: None,
            created_at: now,
            updated_at: now,
        };
        self.store.insert_category(&category).await?;
        tracing::info!(category_id = category.id, name = %name, "Category created by import");
        Ok(category)
    }

    async fn upsert_product(
        &self,
        draft: Product,
        category_id: i64,
    ) -> CatalogResult<ImportOutcome> {
        let existing = self.store.find_product_by_slug(&draft.slug).await?;
        let product = Product {
            category_ids: vec![category_id],
            ..draft
        };

        match existing {
            Some(existing) => {
                let product = Product {
                    id: existing.id,
                    is_featured: existing.is_featured,
                    created_at: existing.created_at,
                    ..product
                };
                self.store.update_product(&product).await?;
                Ok(ImportOutcome {
                    action: ImportAction::Updated,
                    id: product.id,
                })
            }
            None => {
                self.store.insert_product(&product).await?;
                Ok(ImportOutcome {
                    action: ImportAction::Created,
                    id: product.id,
                })
            }
        }
    }
}

/// A validated record waiting for its category
struct Draft {
    category: String,
    product: Product,
}

/// Explicit slug (normalized) if present, otherwise derived from the name
fn record_slug(record: &ImportProduct) -> String {
    let source = if record.slug.trim().is_empty() {
        &record.name
    } else {
        &record.slug
    };
    slugify(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn record(name: &str, slug: &str) -> ImportProduct {
        ImportProduct {
            name: name.to_string(),
            slug: slug.to_string(),
            description: String::new(),
            price: Decimal::ONE,
            compare_at_price: None,
            category: "Flowers".to_string(),
            tags: vec![],
            inventory: 0,
            images: vec![],
            seo_title: String::new(),
            seo_description: String::new(),
            status: Default::default(),
        }
    }

    #[test]
    fn test_record_slug() {
        assert_eq!(record_slug(&record("Red Roses", "")), "red-roses");
        assert_eq!(record_slug(&record("Red Roses", "Roses-12")), "roses-12");
        assert_eq!(record_slug(&record("!!!", "")), "");
    }
}
