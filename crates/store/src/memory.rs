//! In-memory backend for tests and fixtures.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::backend::{FileInfo, StoreBackend, StoreUri};
use crate::error::{Result, StoreError};

/// Backend holding seeded object metadata in memory.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    inner: Arc<RwLock<MemoryStoreInner>>,
}

#[derive(Debug, Default)]
struct MemoryStoreInner {
    /// store ref -> seeded metadata
    entries: HashMap<String, FileInfo>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryStoreInner::default())),
        }
    }

    /// Seed an object's metadata under a store ref.
    pub fn insert(&self, store_ref: impl Into<String>, size: i64, mime_type: impl Into<String>) {
        let mut inner = self.inner.write();
        inner.entries.insert(
            store_ref.into(),
            FileInfo {
                size,
                mime_type: mime_type.into(),
                mime_type_info: serde_json::json!({}),
            },
        );
    }

    pub fn contains(&self, store_ref: &str) -> bool {
        self.inner.read().entries.contains_key(store_ref)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StoreBackend for MemoryStore {
    fn kind(&self) -> &'static str {
        "memory"
    }

    async fn resolve_uri(&self, store_ref: &str) -> Result<StoreUri> {
        if store_ref.is_empty() {
            return Err(StoreError::InvalidRef(store_ref.to_string()));
        }
        Ok(StoreUri {
            kind: self.kind().to_string(),
            value: store_ref.to_string(),
        })
    }

    async fn resolve_metadata(&self, store_ref: &str) -> Result<FileInfo> {
        let inner = self.inner.read();
        inner
            .entries
            .get(store_ref)
            .cloned()
            .ok_or_else(|| StoreError::MissingObject(store_ref.to_string()))
    }
}
