//! Backend capability surface and configuration.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::disk::DiskStore;
use crate::error::Result;
use crate::memory::MemoryStore;

/// Resolved location of a stored object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreUri {
    /// Backend kind that produced the URI ("disk", "memory")
    pub kind: String,
    /// Backend-specific locator, e.g. a physical path
    pub value: String,
}

/// Size and mime metadata for a stored object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    /// Object size in bytes
    pub size: i64,
    /// Mime essence, e.g. "image/png"
    pub mime_type: String,
    /// Free-form backend detail about the mime resolution
    pub mime_type_info: serde_json::Value,
}

/// Capability every backend implements: resolve an opaque store ref
/// to a URI or to object metadata. Backends never serve object bytes.
#[async_trait]
pub trait StoreBackend: Send + Sync + std::fmt::Debug {
    /// Backend kind tag, used as the `StoreUri` kind.
    fn kind(&self) -> &'static str;

    /// Resolve a store ref to its backend URI.
    async fn resolve_uri(&self, store_ref: &str) -> Result<StoreUri>;

    /// Resolve a store ref to size + mime metadata.
    async fn resolve_metadata(&self, store_ref: &str) -> Result<FileInfo>;
}

/// Configuration for one store backend.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreConfig {
    /// In-memory backend (for testing)
    #[default]
    Memory,

    /// Local filesystem backend
    Disk {
        /// Root directory store refs resolve under
        root: PathBuf,
    },
}

impl StoreConfig {
    /// Build the configured backend. Fails fast on unusable configuration.
    pub async fn build(&self) -> Result<Arc<dyn StoreBackend>> {
        let backend: Arc<dyn StoreBackend> = match self {
            StoreConfig::Memory => Arc::new(MemoryStore::new()),
            StoreConfig::Disk { root } => Arc::new(DiskStore::new(root).await?),
        };
        Ok(backend)
    }
}
