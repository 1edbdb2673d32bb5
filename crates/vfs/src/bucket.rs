/**
 * Named store backends and the registry resolving bucket names to them.
 *
 * A `Bucket` pairs a name with a backend; tree nodes carry the name, the
 * registry turns it back into the backend when an operation needs object
 * metadata or a URI.
 */
use std::collections::HashMap;
use std::sync::Arc;

use store::{FileInfo, StoreBackend, StoreUri};

use crate::error::VfsError;

/// A named content store.
#[derive(Debug, Clone)]
pub struct Bucket {
    name: String,
    backend: Arc<dyn StoreBackend>,
}

impl Bucket {
    pub fn new(name: impl Into<String>, backend: Arc<dyn StoreBackend>) -> Self {
        Self {
            name: name.into(),
            backend,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &'static str {
        self.backend.kind()
    }

    /// Backend URI for a stored object.
    pub async fn get_uri(&self, store_ref: &str) -> store::Result<StoreUri> {
        self.backend.resolve_uri(store_ref).await
    }

    /// Backend size/mime metadata for a stored object.
    pub async fn file_info(&self, store_ref: &str) -> store::Result<FileInfo> {
        self.backend.resolve_metadata(store_ref).await
    }
}

/// Bucket name -> backend lookup table, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    buckets: HashMap<String, Bucket>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a bucket, replacing any previous one under the same name.
    pub fn insert(&mut self, bucket: Bucket) {
        self.buckets.insert(bucket.name().to_string(), bucket);
    }

    /// Look up a bucket by name; unknown names fail `InvalidStore`.
    pub fn get(&self, name: &str) -> Result<Bucket, VfsError> {
        self.buckets
            .get(name)
            .cloned()
            .ok_or_else(|| VfsError::InvalidStore(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.buckets.contains_key(name)
    }

    /// Registered bucket names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.buckets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
