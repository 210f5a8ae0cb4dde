//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::WebConfig;
use crate::db::{MemoryStore, PgStore, SharedStore, Store};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the document store and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: WebConfig,
    store: SharedStore,
    /// Present only for the `PostgreSQL` backend; used by the readiness probe.
    pool: Option<PgPool>,
}

impl AppState {
    /// Create state backed by `PostgreSQL`.
    #[must_use]
    pub fn with_postgres(config: WebConfig, pool: PgPool) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store: Arc::new(PgStore::new(pool.clone())),
                pool: Some(pool),
            }),
        }
    }

    /// Create state backed by the in-memory store.
    #[must_use]
    pub fn in_memory(config: WebConfig) -> Self {
        Self::with_store(config, Arc::new(MemoryStore::new()))
    }

    /// Create state over an arbitrary store.
    #[must_use]
    pub fn with_store(config: WebConfig, store: SharedStore) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                pool: None,
            }),
        }
    }

    /// Get a reference to the web configuration.
    #[must_use]
    pub fn config(&self) -> &WebConfig {
        &self.inner.config
    }

    /// Get a reference to the document store.
    #[must_use]
    pub fn store(&self) -> &dyn Store {
        self.inner.store.as_ref()
    }

    /// Get the database pool, if the `PostgreSQL` backend is active.
    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.pool.as_ref()
    }
}
