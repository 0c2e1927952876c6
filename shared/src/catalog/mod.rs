//! Catalog domain logic
//!
//! Pure, storage-agnostic algorithms over the category hierarchy and the
//! product↔category relation:
//!
//! - [`tree`]: flat category list → forest, descendant resolution
//! - [`sync`]: diff a category's carriers against a desired product set
//! - [`desired`]: parse the desired product set from a request payload
//!
//! Nothing here performs I/O. Callers load a snapshot from storage, run the
//! algorithm, and apply the resulting writes themselves.

pub mod desired;
pub mod error;
pub mod sync;
pub mod tree;

pub use desired::DesiredProducts;
pub use error::{AssignmentOp, CatalogError, CatalogResult, FailedWrite, Resource};
pub use sync::{ProductCategoryIndex, SyncPlan, SyncResult, plan_sync};
pub use tree::{
    CategoryIndex, CategoryNode, Forest, OrphanPolicy, build_forest, resolve_descendant_ids,
};
