//! Catalog services
//!
//! Each service holds the shared [`CatalogStore`](crate::db::CatalogStore)
//! handle, reads a fresh snapshot per call and returns
//! [`CatalogError`](shared::catalog::CatalogError) on failure.

pub mod bulk_import;
pub mod category_service;
pub mod category_sync;
pub mod product_service;
pub mod shopify_csv;

pub use bulk_import::BulkImportService;
pub use category_service::CategoryService;
pub use category_sync::CategorySyncService;
pub use product_service::ProductService;
pub use shopify_csv::parse_shopify_csv;
