//! Category Model

use serde::{Deserialize, Serialize};

use super::serde_helpers;

/// Category entity
///
/// Categories form a forest through `parent_id`. The parent graph is not
/// trusted to be acyclic or complete; see [`crate::catalog::tree`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Category {
    pub id: i64,
    pub name: String,
    /// URL-safe unique identifier used by storefront navigation
    pub slug: String,
    /// Parent category; `None` marks a root
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create category payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
    /// Derived from `name` when absent or blank
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "serde_helpers::optional_id")]
    pub parent_id: Option<i64>,
    pub image: Option<String>,
    pub description: Option<String>,
}

/// Update category payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub slug: Option<String>,
    /// Absent: keep. `null` or `""`: make root. Value: reparent.
    #[serde(
        default,
        deserialize_with = "serde_helpers::nullable_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_id: Option<Option<i64>>,
    pub image: Option<String>,
    pub description: Option<String>,
}

/// Category with its number of directly assigned products (admin listing)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryWithCount {
    #[serde(flatten)]
    pub category: Category,
    pub product_count: u64,
}
