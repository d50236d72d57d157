use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use songparts_core::{Part, PartFields, PartId};

use super::r#trait::{DocumentStore, StoreError, StoreResult};

/// In-memory document store for tests/dev.
///
/// Documents are keyed by `(collection, id)`. Each document remembers the order
/// in which it was added so `list` is stable.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    next_seq: u64,
    docs: HashMap<(String, PartId), Entry>,
}

#[derive(Debug, Clone)]
struct Entry {
    seq: u64,
    fields: PartFields,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents across all collections.
    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.docs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("in-memory store lock poisoned".to_string())
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn add(&self, collection: &str, fields: PartFields) -> StoreResult<PartId> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;

        let mut id = PartId::generate();
        while inner.docs.contains_key(&(collection.to_string(), id.clone())) {
            id = PartId::generate();
        }

        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner
            .docs
            .insert((collection.to_string(), id.clone()), Entry { seq, fields });
        Ok(id)
    }

    async fn list(&self, collection: &str) -> StoreResult<Vec<Part>> {
        let inner = self.inner.read().map_err(|_| poisoned())?;

        let mut entries: Vec<(&PartId, &Entry)> = inner
            .docs
            .iter()
            .filter_map(|((c, id), e)| (c == collection).then_some((id, e)))
            .collect();
        entries.sort_by_key(|(_, e)| e.seq);

        Ok(entries
            .into_iter()
            .map(|(id, e)| Part::new(id.clone(), e.fields.clone()))
            .collect())
    }

    async fn get(&self, collection: &str, id: &PartId) -> StoreResult<Option<Part>> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner
            .docs
            .get(&(collection.to_string(), id.clone()))
            .map(|e| Part::new(id.clone(), e.fields.clone())))
    }

    async fn update(&self, collection: &str, id: &PartId, patch: PartFields) -> StoreResult<()> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        match inner.docs.get_mut(&(collection.to_string(), id.clone())) {
            Some(entry) => {
                entry.fields.merge(patch);
                Ok(())
            }
            None => Err(StoreError::not_found(collection, id)),
        }
    }

    async fn delete(&self, collection: &str, id: &PartId) -> StoreResult<()> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        inner.docs.remove(&(collection.to_string(), id.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use serde_json::json;

    use super::*;

    const PARTS: &str = "kappaleen_osa";

    fn fields(value: serde_json::Value) -> PartFields {
        PartFields::from_json(value).unwrap()
    }

    #[tokio::test]
    async fn add_then_get_returns_payload() {
        let store = InMemoryDocumentStore::new();
        let id = store.add(PARTS, fields(json!({"title": "Intro"}))).await.unwrap();

        let part = store.get(PARTS, &id).await.unwrap().expect("part exists");
        assert_eq!(part.id, id);
        assert_eq!(part.to_json(), json!({"id": id.as_str(), "title": "Intro"}));
    }

    #[tokio::test]
    async fn add_assigns_fresh_ids() {
        let store = InMemoryDocumentStore::new();
        let mut seen = HashSet::new();
        for i in 0..200 {
            let id = store.add(PARTS, fields(json!({"n": i}))).await.unwrap();
            assert!(seen.insert(id), "id returned twice");
        }
        assert_eq!(store.len(), 200);
    }

    #[tokio::test]
    async fn list_is_in_creation_order_and_collection_scoped() {
        let store = InMemoryDocumentStore::new();
        let a = store.add(PARTS, fields(json!({"title": "Verse"}))).await.unwrap();
        let b = store.add(PARTS, fields(json!({"title": "Chorus"}))).await.unwrap();
        store.add("other", fields(json!({"title": "Elsewhere"}))).await.unwrap();

        let parts = store.list(PARTS).await.unwrap();
        let ids: Vec<_> = parts.iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids, vec![a, b]);

        assert!(store.list("empty").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_merges_fields() {
        let store = InMemoryDocumentStore::new();
        let id = store
            .add(PARTS, fields(json!({"title": "Intro", "bars": 8})))
            .await
            .unwrap();

        store
            .update(PARTS, &id, fields(json!({"title": "Intro v2"})))
            .await
            .unwrap();

        let part = store.get(PARTS, &id).await.unwrap().unwrap();
        assert_eq!(part.fields.get("title"), Some(&json!("Intro v2")));
        assert_eq!(part.fields.get("bars"), Some(&json!(8)));
    }

    #[tokio::test]
    async fn update_missing_document_is_not_found_and_creates_nothing() {
        let store = InMemoryDocumentStore::new();
        let id = PartId::parse("missing").unwrap();

        let err = store
            .update(PARTS, &id, fields(json!({"title": "x"})))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = InMemoryDocumentStore::new();
        let id = store.add(PARTS, fields(json!({"title": "Outro"}))).await.unwrap();

        store.delete(PARTS, &id).await.unwrap();
        assert!(store.get(PARTS, &id).await.unwrap().is_none());

        store.delete(PARTS, &id).await.unwrap();
        store
            .delete(PARTS, &PartId::parse("never-existed").unwrap())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn same_id_in_other_collection_is_independent() {
        let store = InMemoryDocumentStore::new();
        let id = store.add(PARTS, fields(json!({"title": "Intro"}))).await.unwrap();

        assert!(store.get("other", &id).await.unwrap().is_none());
        store.delete("other", &id).await.unwrap();
        assert!(store.get(PARTS, &id).await.unwrap().is_some());
    }
}
