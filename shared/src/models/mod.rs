//! Data models
//!
//! Shared between the storefront server and the admin frontend (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` snowflakes (see [`crate::util::snowflake_id`]).

pub mod category;
pub mod import;
pub mod product;
pub mod serde_helpers;

// Re-exports
pub use category::*;
pub use import::*;
pub use product::*;
