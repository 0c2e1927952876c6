//! Product Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::serde_helpers;

/// Publication status of a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    Active,
    Draft,
    Archived,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Draft => "draft",
            Self::Archived => "archived",
        }
    }

    /// Parse a stored status, falling back to `Draft` for unknown values
    pub fn parse_lossy(value: &str) -> Self {
        match value {
            "active" => Self::Active,
            "archived" => Self::Archived,
            _ => Self::Draft,
        }
    }
}

/// Product entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: String,
    /// Base price in the primary currency
    pub price: Decimal,
    #[serde(default)]
    pub compare_at_price: Option<Decimal>,
    #[serde(default)]
    pub images: Vec<String>,
    /// Directly assigned categories (set semantics, no ancestry implied)
    #[serde(default)]
    pub category_ids: Vec<i64>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub inventory: i32,
    #[serde(default)]
    pub seo_title: String,
    #[serde(default)]
    pub seo_description: String,
    #[serde(default)]
    pub status: ProductStatus,
    #[serde(default)]
    pub is_featured: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Product {
    /// Whether the product directly carries `category_id`
    pub fn has_category(&self, category_id: i64) -> bool {
        self.category_ids.contains(&category_id)
    }
}

/// Create product payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    /// Derived from `name` when absent or blank
    pub slug: Option<String>,
    pub description: Option<String>,
    pub price: Decimal,
    pub compare_at_price: Option<Decimal>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub category_ids: Vec<i64>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub inventory: Option<i32>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub status: Option<ProductStatus>,
    pub is_featured: Option<bool>,
}

/// Update product payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    /// Absent: keep. `null`: clear. Value: set.
    #[serde(
        default,
        deserialize_with = "serde_helpers::nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub compare_at_price: Option<Option<Decimal>>,
    pub images: Option<Vec<String>>,
    pub category_ids: Option<Vec<i64>>,
    pub tags: Option<Vec<String>>,
    pub inventory: Option<i32>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub status: Option<ProductStatus>,
    pub is_featured: Option<bool>,
}

/// Sort order for storefront product listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductSort {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
}

/// Storefront product listing query (`GET /api/products`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductQuery {
    /// Category id or slug; matches the category and all its descendants
    pub category: Option<String>,
    pub featured: Option<bool>,
    pub sort: Option<ProductSort>,
    pub limit: Option<usize>,
}
