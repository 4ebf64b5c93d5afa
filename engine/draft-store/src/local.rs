//! Local file-based document store
//!
//! Layout: `<data_dir>/<collection path>/<id>.json`. Nested collection paths
//! such as `drafts/L1/state` become nested directories.

use crate::backend::{validate_address, Document, DocumentStore};
use crate::error::{Result, StoreError};
use serde_json::Value;
use std::path::{Path, PathBuf};

const DOCUMENT_EXTENSION: &str = "json";

/// Local file-based document store
pub struct LocalDocumentStore {
    data_dir: PathBuf,
}

impl LocalDocumentStore {
    /// Create a store rooted at `data_dir`, creating the directory if needed
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&data_dir)?;

        tracing::info!("Local document store initialized at: {:?}", data_dir);

        Ok(Self { data_dir })
    }

    /// Get the data directory
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn collection_dir(&self, collection: &str) -> PathBuf {
        collection.split('/').fold(self.data_dir.clone(), |dir, seg| dir.join(seg))
    }

    fn document_path(&self, collection: &str, id: &str) -> PathBuf {
        self.collection_dir(collection).join(format!("{id}.{DOCUMENT_EXTENSION}"))
    }
}

#[async_trait::async_trait]
impl DocumentStore for LocalDocumentStore {
    async fn read_document(&self, collection: &str, id: &str) -> Result<Value> {
        validate_address(collection, Some(id))?;

        let path = self.document_path(collection, id);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::not_found(collection, id));
            }
            Err(e) => return Err(StoreError::Io(e)),
        };

        serde_json::from_slice(&bytes).map_err(|e| StoreError::decode(collection, id, e))
    }

    async fn write_document(&self, collection: &str, id: &str, data: Value) -> Result<()> {
        validate_address(collection, Some(id))?;

        let dir = self.collection_dir(collection);
        tokio::fs::create_dir_all(&dir).await?;

        // Write to a sibling temp file then rename so readers never see a partial document
        let tmp_path = dir.join(format!(".{id}.{}.tmp", uuid::Uuid::new_v4()));
        let bytes = serde_json::to_vec_pretty(&data)?;
        let written = match tokio::fs::write(&tmp_path, bytes).await {
            Ok(()) => tokio::fs::rename(&tmp_path, self.document_path(collection, id)).await,
            Err(e) => Err(e),
        };

        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(StoreError::Io(e));
        }

        Ok(())
    }

    async fn list_documents(&self, collection: &str) -> Result<Vec<Document>> {
        validate_address(collection, None)?;

        let dir = self.collection_dir(collection);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::Io(e)),
        };

        let mut documents = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !entry.file_type().await?.is_file()
                || path.extension().and_then(|ext| ext.to_str()) != Some(DOCUMENT_EXTENSION)
            {
                continue;
            }

            let Some(id) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            if id.starts_with('.') {
                continue;
            }

            let bytes = tokio::fs::read(&path).await?;
            let data = serde_json::from_slice(&bytes)
                .map_err(|e| StoreError::decode(collection, id, e))?;
            documents.push(Document::new(id, data));
        }

        documents.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(documents)
    }

    fn backend_name(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_local_store_creation() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = temp_dir.path().join("store");

        let store = LocalDocumentStore::new(&data_dir).unwrap();
        assert_eq!(store.data_dir(), data_dir.as_path());
        assert!(data_dir.exists());
    }

    #[tokio::test]
    async fn test_write_then_read_nested_collection() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalDocumentStore::new(temp_dir.path()).unwrap();

        let summary = json!({ "summary": [{ "playerId": "BUFQB1", "pickNum": 2 }] });
        store.write_document("drafts/L1/state", "summary", summary.clone()).await.unwrap();

        assert!(temp_dir.path().join("drafts/L1/state/summary.json").exists());
        assert_eq!(store.read_document("drafts/L1/state", "summary").await.unwrap(), summary);
    }

    #[tokio::test]
    async fn test_missing_document_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalDocumentStore::new(temp_dir.path()).unwrap();

        let err = store.read_document("drafts", "L9").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_decode_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalDocumentStore::new(temp_dir.path()).unwrap();

        std::fs::create_dir_all(temp_dir.path().join("drafts")).unwrap();
        std::fs::write(temp_dir.path().join("drafts/L1.json"), b"{not json").unwrap();

        match store.read_document("drafts", "L1").await.unwrap_err() {
            StoreError::Decode { id, .. } => assert_eq!(id, "L1"),
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_list_skips_subcollections_and_foreign_files() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalDocumentStore::new(temp_dir.path()).unwrap();

        store.write_document("drafts", "L2", json!({ "LeagueId": "L2" })).await.unwrap();
        store.write_document("drafts", "L1", json!({ "LeagueId": "L1" })).await.unwrap();
        store.write_document("drafts/L1/state", "summary", json!({})).await.unwrap();
        std::fs::write(temp_dir.path().join("drafts/notes.txt"), b"ignore me").unwrap();

        let docs = store.list_documents("drafts").await.unwrap();
        let ids: Vec<_> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["L1", "L2"]);

        assert!(store.list_documents("draftTokens").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dot_prefixed_id_rejected_on_every_operation() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalDocumentStore::new(temp_dir.path()).unwrap();

        let err = store.write_document("draftTokens", ".7", json!({ "_cardId": "7" })).await.unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
        assert!(matches!(store.read_document("draftTokens", ".7").await, Err(StoreError::Config(_))));

        // Whatever a write accepts, a listing returns
        store.write_document("draftTokens", "7", json!({ "_cardId": "7" })).await.unwrap();
        let docs = store.list_documents("draftTokens").await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, "7");
    }

    #[tokio::test]
    async fn test_failed_write_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalDocumentStore::new(temp_dir.path()).unwrap();

        // A directory where the document file belongs makes the rename fail
        std::fs::create_dir_all(temp_dir.path().join("drafts/L1.json")).unwrap();
        let err = store.write_document("drafts", "L1", json!({ "LeagueId": "L1" })).await.unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));

        let leftovers: Vec<_> = std::fs::read_dir(temp_dir.path().join("drafts"))
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn test_rejects_path_traversal() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalDocumentStore::new(temp_dir.path()).unwrap();

        let err = store.write_document("../outside", "x", json!({})).await.unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }
}
