//! Catalog error taxonomy

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::sync::SyncResult;
use crate::error::{AppError, ErrorCode};

/// Catalog resource kind, used in error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Category,
    Product,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Category => "Category",
            Self::Product => "Product",
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a single assignment write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentOp {
    Add,
    Remove,
}

/// One assignment write that the store rejected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedWrite {
    pub product_id: i64,
    pub op: AssignmentOp,
    pub error: String,
}

/// Catalog operation errors
///
/// `NotFound` and `InvalidInput` are always raised before any write.
/// `PartialFailure` is raised only after every write was attempted.
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("{resource} not found ({key})")]
    NotFound { resource: Resource, key: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{resource} slug '{slug}' already exists")]
    SlugTaken { resource: Resource, slug: String },

    #[error("Parent category {0} does not exist")]
    ParentNotFound(i64),

    #[error("Setting parent {parent_id} on category {category_id} would create a cycle")]
    Cycle { category_id: i64, parent_id: i64 },

    #[error("Category tree would be deeper than {max_depth} levels under parent {parent_id}")]
    TooDeep { parent_id: i64, max_depth: usize },

    #[error(
        "{} of {} assignment writes failed for category '{}'",
        .failed.len(),
        .failed.len() + .result.removed + .result.added,
        .result.category_name
    )]
    PartialFailure {
        /// Writes that did succeed
        result: SyncResult,
        failed: Vec<FailedWrite>,
    },

    #[error("Import file could not be parsed: {0}")]
    ImportParse(String),

    #[error("Import contains no products")]
    ImportEmpty,

    #[error("Store error: {0}")]
    Store(String),
}

impl CatalogError {
    pub fn category_not_found(id: i64) -> Self {
        Self::NotFound {
            resource: Resource::Category,
            key: id.to_string(),
        }
    }

    pub fn product_not_found(id: i64) -> Self {
        Self::NotFound {
            resource: Resource::Product,
            key: id.to_string(),
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        let message = err.to_string();
        match err {
            CatalogError::NotFound { resource, key } => {
                let code = match resource {
                    Resource::Category => ErrorCode::CategoryNotFound,
                    Resource::Product => ErrorCode::ProductNotFound,
                };
                AppError::with_message(code, message).with_detail("id", key)
            }
            CatalogError::InvalidInput(_) => {
                AppError::with_message(ErrorCode::InvalidRequest, message)
            }
            CatalogError::SlugTaken { resource, slug } => {
                let code = match resource {
                    Resource::Category => ErrorCode::CategorySlugExists,
                    Resource::Product => ErrorCode::ProductSlugExists,
                };
                AppError::with_message(code, message).with_detail("slug", slug)
            }
            CatalogError::ParentNotFound(parent_id) => {
                AppError::with_message(ErrorCode::CategoryParentInvalid, message)
                    .with_detail("parent_id", parent_id)
            }
            CatalogError::Cycle {
                category_id,
                parent_id,
            } => AppError::with_message(ErrorCode::CategoryCycleDetected, message)
                .with_detail("category_id", category_id)
                .with_detail("parent_id", parent_id),
            CatalogError::TooDeep {
                parent_id,
                max_depth,
            } => AppError::with_message(ErrorCode::CategoryParentInvalid, message)
                .with_detail("parent_id", parent_id)
                .with_detail("max_depth", max_depth),
            CatalogError::PartialFailure { result, failed } => {
                let failed_ids: Vec<i64> = failed.iter().map(|f| f.product_id).collect();
                AppError::with_message(ErrorCode::AssignmentPartialFailure, message)
                    .with_detail("failed_product_ids", failed_ids)
                    .with_detail(
                        "failed",
                        serde_json::to_value(&failed).unwrap_or_default(),
                    )
                    .with_detail(
                        "applied",
                        serde_json::to_value(&result).unwrap_or_default(),
                    )
            }
            CatalogError::ImportParse(_) => {
                AppError::with_message(ErrorCode::ImportParseFailed, message)
            }
            CatalogError::ImportEmpty => AppError::with_message(ErrorCode::ImportEmpty, message),
            CatalogError::Store(_) => AppError::with_message(ErrorCode::DatabaseError, message),
        }
    }
}
