//! Error types for the document store

use thiserror::Error;

/// Result type alias for document store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur while talking to the document store
#[derive(Error, Debug)]
pub enum StoreError {
    /// The addressed document does not exist
    #[error("Document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    /// A stored document could not be decoded into the requested type
    #[error("Malformed document at {collection}/{id}: {source}")]
    Decode {
        collection: String,
        id: String,
        #[source]
        source: serde_json::Error,
    },

    /// I/O errors from the underlying storage
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be serialized for writing
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration or addressing errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// Create a new not found error
    pub fn not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound { collection: collection.into(), id: id.into() }
    }

    /// Create a new decode error
    pub fn decode(
        collection: impl Into<String>,
        id: impl Into<String>,
        source: serde_json::Error,
    ) -> Self {
        Self::Decode { collection: collection.into(), id: id.into(), source }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
