use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use songparts_core::{Part, PartFields, PartId};

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Document store operation error.
///
/// These are **infrastructure errors** as opposed to domain errors. Only
/// `NotFound` carries meaning for callers; everything else is surfaced to HTTP
/// clients as an opaque internal error.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document not found: {collection}/{id}")]
    NotFound { collection: String, id: PartId },

    #[error("database error: {0}")]
    Database(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn not_found(collection: &str, id: &PartId) -> Self {
        Self::NotFound {
            collection: collection.to_string(),
            id: id.clone(),
        }
    }
}

/// Collection-scoped document store.
///
/// Implementations must be safe for concurrent use; a single handle is shared
/// by every request.
///
/// ## Semantics
///
/// - `add` assigns a fresh, never reused id.
/// - `list` returns every document of the collection in creation order (unbounded).
/// - `get` returns `Ok(None)` for a missing document.
/// - `update` shallow-merges `patch` into the stored fields and fails with
///   `StoreError::NotFound` if the document does not exist.
/// - `delete` is idempotent: removing a missing document succeeds.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn add(&self, collection: &str, fields: PartFields) -> StoreResult<PartId>;

    async fn list(&self, collection: &str) -> StoreResult<Vec<Part>>;

    async fn get(&self, collection: &str, id: &PartId) -> StoreResult<Option<Part>>;

    async fn update(&self, collection: &str, id: &PartId, patch: PartFields) -> StoreResult<()>;

    async fn delete(&self, collection: &str, id: &PartId) -> StoreResult<()>;
}

#[async_trait]
impl<S> DocumentStore for Arc<S>
where
    S: DocumentStore + ?Sized,
{
    async fn add(&self, collection: &str, fields: PartFields) -> StoreResult<PartId> {
        (**self).add(collection, fields).await
    }

    async fn list(&self, collection: &str) -> StoreResult<Vec<Part>> {
        (**self).list(collection).await
    }

    async fn get(&self, collection: &str, id: &PartId) -> StoreResult<Option<Part>> {
        (**self).get(collection, id).await
    }

    async fn update(&self, collection: &str, id: &PartId, patch: PartFields) -> StoreResult<()> {
        (**self).update(collection, id, patch).await
    }

    async fn delete(&self, collection: &str, id: &PartId) -> StoreResult<()> {
        (**self).delete(collection, id).await
    }
}
