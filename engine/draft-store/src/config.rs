//! Configuration for the document store

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which backend serves documents
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local map, lost on restart
    Memory,
    /// JSON files under `data_dir`
    Local,
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "local" => Ok(Self::Local),
            other => Err(format!("unknown store backend: {other}")),
        }
    }
}

/// Configuration for the document store
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Backend selection
    pub backend: StoreBackend,

    /// Base directory for the local backend
    pub data_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { backend: StoreBackend::Local, data_dir: PathBuf::from("./data") }
    }
}

impl StoreConfig {
    /// Create a local-backend configuration rooted at `data_dir`
    pub fn local(data_dir: impl Into<PathBuf>) -> Self {
        Self { backend: StoreBackend::Local, data_dir: data_dir.into() }
    }

    /// Create an in-memory configuration
    pub fn memory() -> Self {
        Self { backend: StoreBackend::Memory, ..Default::default() }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.backend == StoreBackend::Local && self.data_dir.as_os_str().is_empty() {
            return Err("Local store requires a non-empty data_dir".to_string());
        }

        Ok(())
    }
}
