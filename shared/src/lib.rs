//! Shared types for the storefront
//!
//! Common types used by the storefront server and its clients: data models,
//! the unified error system, and the pure catalog algorithms (category tree,
//! assignment sync).

pub mod catalog;
pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use catalog::{CatalogError, CatalogResult};
pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
