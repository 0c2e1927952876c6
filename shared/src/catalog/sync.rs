//! Category assignment synchronization planning
//!
//! An admin submits the complete list of products that should carry a
//! category. [`plan_sync`] diffs that desired set against the current
//! assignments and yields the minimal set of writes. Only direct
//! assignments of the target category are touched; ancestor and descendant
//! categories are never modified.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::models::Product;

/// Current product → category assignments, restricted to the relation itself
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductCategoryIndex {
    assignments: BTreeMap<i64, BTreeSet<i64>>,
}

impl ProductCategoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_products<'a>(products: impl IntoIterator<Item = &'a Product>) -> Self {
        let assignments = products
            .into_iter()
            .map(|p| (p.id, p.category_ids.iter().copied().collect()))
            .collect();
        Self { assignments }
    }

    /// Register a product with its current category set
    pub fn insert(&mut self, product_id: i64, category_ids: impl IntoIterator<Item = i64>) {
        self.assignments
            .entry(product_id)
            .or_default()
            .extend(category_ids);
    }

    pub fn contains_product(&self, product_id: i64) -> bool {
        self.assignments.contains_key(&product_id)
    }

    pub fn categories_of(&self, product_id: i64) -> Option<&BTreeSet<i64>> {
        self.assignments.get(&product_id)
    }

    /// Products currently carrying `category_id`
    pub fn carriers(&self, category_id: i64) -> BTreeSet<i64> {
        self.assignments
            .iter()
            .filter(|(_, categories)| categories.contains(&category_id))
            .map(|(&product_id, _)| product_id)
            .collect()
    }

    /// Apply a plan in memory (used to predict the post-sync state)
    pub fn apply(&mut self, plan: &SyncPlan) {
        for product_id in &plan.to_remove {
            if let Some(categories) = self.assignments.get_mut(product_id) {
                categories.remove(&plan.category_id);
            }
        }
        for product_id in &plan.to_add {
            if let Some(categories) = self.assignments.get_mut(product_id) {
                categories.insert(plan.category_id);
            }
        }
    }
}

/// Writes needed to make a category's carrier set equal a desired set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncPlan {
    pub category_id: i64,
    /// Current carriers not in the desired set
    pub to_remove: BTreeSet<i64>,
    /// Desired products that do not carry the category yet
    pub to_add: BTreeSet<i64>,
    /// Desired ids that match no stored product
    pub ignored: BTreeSet<i64>,
}

impl SyncPlan {
    pub fn is_noop(&self) -> bool {
        self.to_remove.is_empty() && self.to_add.is_empty()
    }

    pub fn write_count(&self) -> usize {
        self.to_remove.len() + self.to_add.len()
    }
}

/// Compute the writes that turn the current carriers of `category_id` into
/// exactly `desired` (minus ids unknown to `index`).
pub fn plan_sync(
    category_id: i64,
    desired: &BTreeSet<i64>,
    index: &ProductCategoryIndex,
) -> SyncPlan {
    let current = index.carriers(category_id);

    let (known, ignored): (BTreeSet<i64>, BTreeSet<i64>) = desired
        .iter()
        .copied()
        .partition(|id| index.contains_product(*id));

    SyncPlan {
        category_id,
        to_remove: current.difference(&known).copied().collect(),
        to_add: known.difference(&current).copied().collect(),
        ignored,
    }
}

/// Outcome of a completed synchronization
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncResult {
    pub category_id: i64,
    pub category_name: String,
    pub removed: usize,
    pub added: usize,
    /// Desired ids that matched no product
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignored: Vec<i64>,
}

impl SyncResult {
    pub fn message(&self) -> String {
        format!("Successfully updated {} assignments.", self.category_name)
    }
}
