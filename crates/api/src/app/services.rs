use std::sync::Arc;

use songparts_core::{Part, PartFields, PartId};
use songparts_infra::config::{AppConfig, DEFAULT_COLLECTION};
use songparts_infra::document_store::{self, DocumentStore, InMemoryDocumentStore, StoreResult};

/// Process-wide services handed to every handler.
///
/// Holds the single store handle and the collection the parts live in.
#[derive(Clone)]
pub struct AppServices {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl AppServices {
    pub fn new(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    /// Services backed by a fresh in-memory store and the default collection.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryDocumentStore::new()), DEFAULT_COLLECTION)
    }

    /// Connect the configured store backend.
    pub async fn from_config(config: &AppConfig) -> StoreResult<Self> {
        let store = document_store::connect(&config.store).await?;
        Ok(Self::new(store, config.collection.clone()))
    }

    pub async fn create_part(&self, fields: PartFields) -> StoreResult<PartId> {
        self.store.add(&self.collection, fields).await
    }

    /// All parts, unbounded. Large collections are returned in one response.
    pub async fn list_parts(&self) -> StoreResult<Vec<Part>> {
        self.store.list(&self.collection).await
    }

    pub async fn get_part(&self, id: &PartId) -> StoreResult<Option<Part>> {
        self.store.get(&self.collection, id).await
    }

    pub async fn update_part(&self, id: &PartId, patch: PartFields) -> StoreResult<()> {
        self.store.update(&self.collection, id, patch).await
    }

    pub async fn delete_part(&self, id: &PartId) -> StoreResult<()> {
        self.store.delete(&self.collection, id).await
    }
}
