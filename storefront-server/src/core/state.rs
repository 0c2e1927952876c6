use std::sync::Arc;

use crate::core::Config;
use crate::db::{CatalogStore, MemoryStore, PgStore};
use crate::services::{BulkImportService, CategoryService, CategorySyncService, ProductService};

/// Shared server state
///
/// Cheap to clone: every field is an `Arc` or holds one.
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub store: Arc<dyn CatalogStore>,
    pub products: ProductService,
    pub categories: CategoryService,
    pub category_sync: CategorySyncService,
    pub importer: BulkImportService,
}

impl ServerState {
    /// Connect the configured store and build the services
    ///
    /// Without `DATABASE_URL` the server runs on an empty in-memory store.
    pub async fn initialize(config: &Config) -> anyhow::Result<Self> {
        let store: Arc<dyn CatalogStore> = match config.database_url.as_deref() {
            Some(url) => {
                let store = PgStore::connect(url).await?;
                tracing::info!("Connected to PostgreSQL, migrations applied");
                Arc::new(store)
            }
            None => {
                if config.is_production() {
                    anyhow::bail!("DATABASE_URL must be set in production");
                }
                tracing::warn!("DATABASE_URL not set, using in-memory catalog store");
                Arc::new(MemoryStore::new())
            }
        };
        Ok(Self::with_store(config.clone(), store))
    }

    /// Build the state around an existing store
    pub fn with_store(config: Config, store: Arc<dyn CatalogStore>) -> Self {
        Self {
            products: ProductService::new(store.clone()),
            categories: CategoryService::new(store.clone(), config.orphan_policy),
            category_sync: CategorySyncService::new(store.clone()),
            importer: BulkImportService::new(store.clone(), config.import_placeholder_image.clone()),
            config: Arc::new(config),
            store,
        }
    }
}
