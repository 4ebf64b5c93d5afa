//! In-memory document store (for tests and local runs)

use crate::backend::{validate_address, Document, DocumentStore};
use crate::error::{Result, StoreError};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

type Collections = HashMap<String, BTreeMap<String, Value>>;

/// In-memory document store
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    collections: Arc<RwLock<Collections>>,
}

impl InMemoryDocumentStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with `(collection, id, data)` documents
    pub fn with_documents<I, C, D>(documents: I) -> Self
    where
        I: IntoIterator<Item = (C, D, Value)>,
        C: Into<String>,
        D: Into<String>,
    {
        let mut collections = Collections::new();
        for (collection, id, data) in documents {
            collections.entry(collection.into()).or_default().insert(id.into(), data);
        }
        Self { collections: Arc::new(RwLock::new(collections)) }
    }

    /// Number of documents currently held in `collection`
    pub async fn document_count(&self, collection: &str) -> usize {
        self.collections.read().await.get(collection).map_or(0, BTreeMap::len)
    }
}

#[async_trait::async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn read_document(&self, collection: &str, id: &str) -> Result<Value> {
        validate_address(collection, Some(id))?;

        let collections = self.collections.read().await;
        collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned()
            .ok_or_else(|| StoreError::not_found(collection, id))
    }

    async fn write_document(&self, collection: &str, id: &str, data: Value) -> Result<()> {
        validate_address(collection, Some(id))?;

        let mut collections = self.collections.write().await;
        collections.entry(collection.to_string()).or_default().insert(id.to_string(), data);
        Ok(())
    }

    async fn list_documents(&self, collection: &str) -> Result<Vec<Document>> {
        validate_address(collection, None)?;

        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter().map(|(id, data)| Document::new(id.clone(), data.clone())).collect()
            })
            .unwrap_or_default())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_missing_document_is_not_found() {
        let store = InMemoryDocumentStore::new();
        let err = store.read_document("drafts", "nope").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_write_overwrites() {
        let store = InMemoryDocumentStore::new();
        store.write_document("draftTokens", "7", json!({ "v": 1 })).await.unwrap();
        store.write_document("draftTokens", "7", json!({ "v": 2 })).await.unwrap();

        assert_eq!(store.read_document("draftTokens", "7").await.unwrap(), json!({ "v": 2 }));
        assert_eq!(store.document_count("draftTokens").await, 1);
    }

    #[tokio::test]
    async fn test_list_documents() {
        let store = InMemoryDocumentStore::with_documents(vec![
            ("drafts", "L2", json!({ "LeagueId": "L2" })),
            ("drafts", "L1", json!({ "LeagueId": "L1" })),
            ("drafts/L1/state", "summary", json!({ "summary": [] })),
        ]);

        let leagues = store.list_documents("drafts").await.unwrap();
        let ids: Vec<_> = leagues.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["L1", "L2"]);

        // Nested collections are independent of their parent
        assert_eq!(store.list_documents("drafts/L1/state").await.unwrap().len(), 1);
        assert!(store.list_documents("playerStats2023").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dot_prefixed_id_rejected_like_local() {
        let store = InMemoryDocumentStore::new();
        let err = store.write_document("draftTokens", ".7", json!({})).await.unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
        assert_eq!(store.document_count("draftTokens").await, 0);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = InMemoryDocumentStore::new();
        let other = store.clone();
        store.write_document("drafts", "L1", json!({})).await.unwrap();
        assert!(other.read_document("drafts", "L1").await.is_ok());
    }
}
