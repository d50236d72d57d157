//! Document store boundary.
//!
//! The HTTP layer talks to a single [`DocumentStore`] handle constructed once
//! at startup. Two backends exist: a process-local map and Postgres JSONB.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

use std::sync::Arc;

pub use in_memory::InMemoryDocumentStore;
pub use postgres::PostgresDocumentStore;
pub use r#trait::{DocumentStore, StoreError, StoreResult};

use crate::config::StoreConfig;

/// Build the store selected by configuration.
pub async fn connect(config: &StoreConfig) -> StoreResult<Arc<dyn DocumentStore>> {
    match config {
        StoreConfig::Memory => {
            tracing::warn!("DATABASE_URL not set; using in-memory store (data is lost on restart)");
            Ok(Arc::new(InMemoryDocumentStore::new()))
        }
        StoreConfig::Postgres {
            url,
            max_connections,
        } => {
            let store = PostgresDocumentStore::connect(url, *max_connections).await?;
            tracing::info!(max_connections, "connected to postgres document store");
            Ok(Arc::new(store))
        }
    }
}
