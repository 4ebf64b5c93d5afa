//! Document store trait and backend construction

use crate::config::{StoreBackend, StoreConfig};
use crate::error::{Result, StoreError};
use crate::local::LocalDocumentStore;
use crate::memory::InMemoryDocumentStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// A stored document together with its id
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

impl Document {
    pub fn new(id: impl Into<String>, data: Value) -> Self {
        Self { id: id.into(), data }
    }

    /// Decode the document body, attributing failures to `collection/id`
    pub fn decode<T: DeserializeOwned>(&self, collection: &str) -> Result<T> {
        serde_json::from_value(self.data.clone())
            .map_err(|e| StoreError::decode(collection, &self.id, e))
    }
}

/// Abstract trait for document backends
///
/// Writes are full overwrites. No multi-document transactions are offered;
/// concurrent writers to the same document resolve last-writer-wins.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read one document, failing with [`StoreError::NotFound`] when absent
    async fn read_document(&self, collection: &str, id: &str) -> Result<Value>;

    /// Create or replace one document
    async fn write_document(&self, collection: &str, id: &str, data: Value) -> Result<()>;

    /// List every document of a collection. A missing collection is empty.
    async fn list_documents(&self, collection: &str) -> Result<Vec<Document>>;

    /// Short backend name for logs
    fn backend_name(&self) -> &'static str;
}

/// Typed helpers layered over any [`DocumentStore`]
#[async_trait::async_trait]
pub trait DocumentStoreExt: DocumentStore {
    /// Read a document and decode it into `T`
    async fn read_as<T>(&self, collection: &str, id: &str) -> Result<T>
    where
        T: DeserializeOwned + Send,
    {
        let data = self.read_document(collection, id).await?;
        serde_json::from_value(data).map_err(|e| StoreError::decode(collection, id, e))
    }

    /// Serialize `value` and write it as a document
    async fn write_as<T>(&self, collection: &str, id: &str, value: &T) -> Result<()>
    where
        T: Serialize + Sync,
    {
        let data = serde_json::to_value(value)?;
        self.write_document(collection, id, data).await
    }
}

impl<S: DocumentStore + ?Sized> DocumentStoreExt for S {}

/// Build the backend selected by `config`
pub fn create_document_store(config: &StoreConfig) -> Result<Arc<dyn DocumentStore>> {
    config.validate().map_err(StoreError::config)?;

    let store: Arc<dyn DocumentStore> = match config.backend {
        StoreBackend::Memory => Arc::new(InMemoryDocumentStore::new()),
        StoreBackend::Local => Arc::new(LocalDocumentStore::new(&config.data_dir)?),
    };

    tracing::info!("Document store ready (backend: {})", store.backend_name());
    Ok(store)
}

/// Reject collection paths and ids that could escape the store namespace.
///
/// Ids may not start with `.`; the local backend reserves that prefix for
/// in-progress temp files and leaves them out of listings.
pub(crate) fn validate_address(collection: &str, id: Option<&str>) -> Result<()> {
    if collection.is_empty() || collection.split('/').any(|seg| seg.is_empty() || seg == "..") {
        return Err(StoreError::config(format!("invalid collection path: {collection:?}")));
    }

    if let Some(id) = id {
        if id.is_empty() || id.contains('/') || id.starts_with('.') {
            return Err(StoreError::config(format!("invalid document id: {id:?}")));
        }
    }

    Ok(())
}
