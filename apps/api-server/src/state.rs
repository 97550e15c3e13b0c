//! Application state - shared across all handlers.

use std::sync::Arc;

use scribe_core::ports::{CategoryStore, PostStore, TagStore};
use scribe_core::service::{CategoryService, PostService, TagService};
use scribe_infra::{DatabaseConfig, InMemoryStore};

#[cfg(feature = "postgres")]
use scribe_infra::{PostgresCategoryStore, PostgresPostStore, PostgresTagStore};

/// Shared application state: one lifecycle service per entity, all backed by
/// the same store.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub categories: CategoryService,
    pub tags: TagService,
}

impl AppState {
    /// Build the application state with appropriate store implementations.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Self {
        #[cfg(feature = "postgres")]
        if let Some(config) = db_config {
            match scribe_infra::connect(config).await {
                Ok(conn) => {
                    let state = Self::from_stores(
                        Arc::new(PostgresPostStore::new(conn.clone())),
                        Arc::new(PostgresCategoryStore::new(conn.clone())),
                        Arc::new(PostgresTagStore::new(conn)),
                    );
                    tracing::info!("Application state initialized (postgres)");
                    return state;
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    return Self::in_memory();
                }
            }
        }

        #[cfg(not(feature = "postgres"))]
        let _ = db_config;

        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        Self::in_memory()
    }

    /// State over a fresh in-memory store. Also used by the handler tests.
    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self::from_stores(store.clone(), store.clone(), store)
    }

    fn from_stores(
        posts: Arc<dyn PostStore>,
        categories: Arc<dyn CategoryStore>,
        tags: Arc<dyn TagStore>,
    ) -> Self {
        Self {
            posts: PostService::new(posts),
            categories: CategoryService::new(categories),
            tags: TagService::new(tags),
        }
    }
}
