//! # Draft Store
//!
//! Document store abstraction used by the draft statistics pipelines.
//! Every record (league, draft summary, stats table, draft token, card score)
//! is a JSON document addressed by a collection path and a document id.
//!
//! ## Architecture
//!
//! - **DocumentStore**: Abstract trait for document backends
//! - **DocumentStoreExt**: Typed read/write helpers available on every backend
//! - **InMemoryDocumentStore**: Map-backed implementation for tests and local runs
//! - **LocalDocumentStore**: One JSON file per document under a data directory
//!
//! ## Usage
//!
//! ```rust
//! use draft_store::{DocumentStore, DocumentStoreExt, InMemoryDocumentStore};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = InMemoryDocumentStore::new();
//!     store.write_document("drafts", "league-1", json!({ "IsLocked": true })).await?;
//!
//!     let league: serde_json::Value = store.read_as("drafts", "league-1").await?;
//!     assert_eq!(league["IsLocked"], true);
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod local;
pub mod memory;

pub use backend::{create_document_store, Document, DocumentStore, DocumentStoreExt};
pub use config::{StoreBackend, StoreConfig};
pub use error::{Result, StoreError};
pub use local::LocalDocumentStore;
pub use memory::InMemoryDocumentStore;
