//! Category assignment synchronization
//!
//! Full-replace semantics: after a successful [`CategorySyncService::sync`]
//! the set of products carrying the category is exactly the submitted set
//! (minus ids that match no product). A product left out of the submission
//! LOSES the category.

use std::sync::Arc;

use shared::catalog::{
    AssignmentOp, CatalogError, CatalogResult, DesiredProducts, FailedWrite,
    ProductCategoryIndex, SyncResult, plan_sync,
};
use shared::models::Category;

use crate::db::CatalogStore;

#[derive(Clone)]
pub struct CategorySyncService {
    store: Arc<dyn CatalogStore>,
}

impl CategorySyncService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Ids of products directly carrying the category, ascending
    pub async fn assigned_products(&self, category_id: i64) -> CatalogResult<Vec<i64>> {
        self.ensure_category(category_id).await?;
        let products = self.store.list_products().await?;
        let index = ProductCategoryIndex::from_products(&products);
        Ok(index.carriers(category_id).into_iter().collect())
    }

    /// Make the category's carriers equal `desired`
    ///
    /// Every removal and addition is an independent, idempotent point write.
    /// A failed write does not stop the others; once all were attempted the
    /// failures are reported as [`CatalogError::PartialFailure`]. There is no
    /// retry and no rollback, and concurrent syncs of the same product are
    /// last-write-wins.
    pub async fn sync(
        &self,
        category_id: i64,
        desired: &DesiredProducts,
    ) -> CatalogResult<SyncResult> {
        let category = self.ensure_category(category_id).await?;

        let products = self.store.list_products().await?;
        let index = ProductCategoryIndex::from_products(&products);
        let plan = plan_sync(category_id, desired.ids(), &index);

        if !plan.ignored.is_empty() {
            tracing::warn!(
                category_id,
                ignored = ?plan.ignored,
                "Sync request references unknown products, ignoring them"
            );
        }

        let mut result = SyncResult {
            category_id,
            category_name: category.name,
            removed: 0,
            added: 0,
            ignored: plan.ignored.iter().copied().collect(),
        };
        let mut failed = Vec::new();

        for &product_id in &plan.to_remove {
            match self
                .store
                .remove_product_category(product_id, category_id)
                .await
            {
                Ok(_) => result.removed += 1,
                Err(e) => failed.push(FailedWrite {
                    product_id,
                    op: AssignmentOp::Remove,
                    error: e.to_string(),
                }),
            }
        }

        for &product_id in &plan.to_add {
            match self.store.add_product_category(product_id, category_id).await {
                Ok(_) => result.added += 1,
                Err(e) => failed.push(FailedWrite {
                    product_id,
                    op: AssignmentOp::Add,
                    error: e.to_string(),
                }),
            }
        }

        if !failed.is_empty() {
            tracing::error!(
                category_id,
                failed = failed.len(),
                removed = result.removed,
                added = result.added,
                "Category sync partially failed"
            );
            return Err(CatalogError::PartialFailure { result, failed });
        }

        tracing::info!(
            category_id,
            removed = result.removed,
            added = result.added,
            "Category assignments synced"
        );
        Ok(result)
    }

    async fn ensure_category(&self, category_id: i64) -> CatalogResult<Category> {
        self.store
            .find_category(category_id)
            .await?
            .ok_or_else(|| CatalogError::category_not_found(category_id))
    }
}
