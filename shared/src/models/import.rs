//! Bulk import payloads

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::product::ProductStatus;

/// One product as delivered by a bulk upload (JSON body or parsed CSV)
///
/// `category` is a category *name*; it is matched case-insensitively and
/// created when missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportProduct {
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub compare_at_price: Option<Decimal>,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub inventory: i32,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub seo_title: String,
    #[serde(default)]
    pub seo_description: String,
    #[serde(default)]
    pub status: ProductStatus,
}

/// Bulk upload request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkImportRequest {
    pub products: Vec<ImportProduct>,
}

/// What happened to one imported product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportAction {
    Created,
    Updated,
}

/// Per-product import outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub action: ImportAction,
    pub id: i64,
}

/// Bulk import summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    pub count: usize,
    /// Categories created on the fly, by name
    pub created_categories: Vec<String>,
    pub results: Vec<ImportOutcome>,
}
