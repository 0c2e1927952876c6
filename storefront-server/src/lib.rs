//! Storefront Server - catalog back-office for an online store
//!
//! # Overview
//!
//! - **Categories** (`services::category_service`): CRUD with parent guards,
//!   navigation tree, descendant resolution
//! - **Assignments** (`services::category_sync`): full-replace sync of the
//!   products carrying a category
//! - **Products** (`services::product_service`): CRUD and storefront listing
//!   filtered by category subtree
//! - **Import** (`services::bulk_import`): JSON or Shopify CSV bulk upsert
//!
//! # Module structure
//!
//! ```text
//! storefront-server/src/
//! ├── core/          # configuration, shared state
//! ├── db/            # CatalogStore trait, in-memory and PostgreSQL stores
//! ├── services/      # catalog business logic
//! ├── api/           # HTTP routes and handlers
//! └── utils/         # logging, validation
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

// Re-export public types
pub use api::build_app;
pub use crate::core::{Config, ServerState};
pub use db::{CatalogStore, MemoryStore, PgStore, StoreError};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
