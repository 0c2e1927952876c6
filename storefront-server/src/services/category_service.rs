//! Category management
//!
//! Writes keep the parent graph well-formed: a new or changed parent must
//! exist and must not close a cycle. Reads make no such assumption, since rows
//! may have been written by older tooling or directly in the database.

use std::sync::Arc;

use shared::catalog::{
    CatalogError, CatalogResult, CategoryIndex, Forest, OrphanPolicy, build_forest,
};
use shared::models::{Category, CategoryCreate, CategoryUpdate, CategoryWithCount};
use shared::util::{now_millis, snowflake_id};

use crate::db::CatalogStore;
use crate::utils::validation::{
    MAX_CATEGORY_DEPTH, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_URL_LEN, validate_optional_text, validate_required_text,
    validate_slug,
};

use super::product_service::resolve_slug;

#[derive(Clone)]
pub struct CategoryService {
    store: Arc<dyn CatalogStore>,
    orphan_policy: OrphanPolicy,
}

impl CategoryService {
    pub fn new(store: Arc<dyn CatalogStore>, orphan_policy: OrphanPolicy) -> Self {
        Self {
            store,
            orphan_policy,
        }
    }

    pub fn orphan_policy(&self) -> OrphanPolicy {
        self.orphan_policy
    }

    /// All categories with their number of directly assigned products
    pub async fn list_with_counts(&self) -> CatalogResult<Vec<CategoryWithCount>> {
        let categories = self.store.list_categories().await?;
        let counts = self.store.category_product_counts().await?;
        Ok(categories
            .into_iter()
            .map(|category| CategoryWithCount {
                product_count: counts.get(&category.id).copied().unwrap_or(0),
                category,
            })
            .collect())
    }

    pub async fn get(&self, id: i64) -> CatalogResult<Category> {
        self.store
            .find_category(id)
            .await?
            .ok_or_else(|| CatalogError::category_not_found(id))
    }

    /// Category navigation tree under the configured orphan policy
    pub async fn tree(&self) -> CatalogResult<Forest> {
        let categories = self.store.list_categories().await?;
        let forest = build_forest(categories, self.orphan_policy);
        if !forest.orphans.is_empty() {
            tracing::debug!(
                orphans = ?forest.orphans,
                policy = ?self.orphan_policy,
                "Categories with missing parent"
            );
        }
        Ok(forest)
    }

    /// The category and all of its descendants, sorted by id
    pub async fn descendant_ids(&self, id: i64) -> CatalogResult<Vec<i64>> {
        let categories = self.store.list_categories().await?;
        let index = CategoryIndex::new(&categories);
        if !index.contains(id) {
            return Err(CatalogError::category_not_found(id));
        }
        let mut ids: Vec<i64> = index.descendant_ids(id).into_iter().collect();
        ids.sort_unstable();
        Ok(ids)
    }

    pub async fn create(&self, payload: CategoryCreate) -> CatalogResult<Category> {
        if let Some(parent_id) = payload.parent_id {
            let categories = self.store.list_categories().await?;
            let index = CategoryIndex::new(&categories);
            if !index.contains(parent_id) {
                return Err(CatalogError::ParentNotFound(parent_id));
            }
            check_depth(&index, parent_id, 1)?;
        }

        let now = now_millis();
        let category = Category {
            id: snowflake_id(),
            slug: resolve_slug(payload.slug.as_deref(), &payload.name),
            name: payload.name.trim().to_string(),
            parent_id: payload.parent_id,
            image: payload.image,
            description: payload.description,
            created_at: now,
            updated_at: now,
        };

        validate_category(&category)?;
        self.store.insert_category(&category).await?;

        tracing::info!(
            category_id = category.id,
            slug = %category.slug,
            parent_id = ?category.parent_id,
            "Category created"
        );
        Ok(category)
    }

    pub async fn update(&self, id: i64, payload: CategoryUpdate) -> CatalogResult<Category> {
        let mut category = self.get(id).await?;

        if let Some(name) = payload.name {
            category.name = name.trim().to_string();
        }
        if let Some(slug) = payload.slug {
            category.slug = resolve_slug(Some(&slug), &category.name);
        }
        if let Some(image) = payload.image {
            category.image = Some(image).filter(|s| !s.is_empty());
        }
        if let Some(description) = payload.description {
            category.description = Some(description).filter(|s| !s.is_empty());
        }
        if let Some(parent_id) = payload.parent_id {
            if let Some(parent_id) = parent_id {
                self.check_parent(id, parent_id).await?;
            }
            category.parent_id = parent_id;
        }
        category.updated_at = now_millis();

        validate_category(&category)?;
        self.store.update_category(&category).await?;

        tracing::info!(category_id = id, parent_id = ?category.parent_id, "Category updated");
        Ok(category)
    }

    /// Delete a category
    ///
    /// Products lose the assignment; direct children become roots.
    pub async fn delete(&self, id: i64) -> CatalogResult<()> {
        if !self.store.delete_category(id).await? {
            return Err(CatalogError::category_not_found(id));
        }
        tracing::info!(category_id = id, "Category deleted");
        Ok(())
    }

    async fn check_parent(&self, category_id: i64, parent_id: i64) -> CatalogResult<()> {
        let categories = self.store.list_categories().await?;
        let index = CategoryIndex::new(&categories);
        if parent_id != category_id && !index.contains(parent_id) {
            return Err(CatalogError::ParentNotFound(parent_id));
        }
        if index.would_create_cycle(category_id, parent_id) {
            return Err(CatalogError::Cycle {
                category_id,
                parent_id,
            });
        }
        check_depth(&index, parent_id, index.subtree_height(category_id))
    }
}

/// Reject attaching `height` levels below `parent_id` past the depth limit
fn check_depth(index: &CategoryIndex<'_>, parent_id: i64, height: usize) -> CatalogResult<()> {
    let parent_depth = index.ancestor_ids(parent_id).len() + 1;
    if parent_depth + height > MAX_CATEGORY_DEPTH {
        return Err(CatalogError::TooDeep {
            parent_id,
            max_depth: MAX_CATEGORY_DEPTH,
        });
    }
    Ok(())
}

fn validate_category(category: &Category) -> CatalogResult<()> {
    validate_required_text(&category.name, "name", MAX_NAME_LEN)?;
    validate_slug(&category.slug, "slug")?;
    validate_optional_text(&category.image, "image", MAX_URL_LEN)?;
    validate_optional_text(&category.description, "description", MAX_NOTE_LEN)?;
    Ok(())
}
