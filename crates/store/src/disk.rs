//! Local-filesystem backend.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::backend::{FileInfo, StoreBackend, StoreUri};
use crate::error::{Result, StoreError};

/// Backend resolving store refs against a root directory. A store ref is
/// the object's slash-separated path relative to the root.
#[derive(Debug, Clone)]
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    /// Create a backend rooted at `root`, creating the directory if missing.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        tokio::fs::create_dir_all(root).await?;
        let root = tokio::fs::canonicalize(root).await?;
        debug!(root = %root.display(), "disk store ready");
        Ok(Self { root })
    }

    /// Physical path for a store ref. Refs may not escape the root.
    fn object_path(&self, store_ref: &str) -> Result<PathBuf> {
        if store_ref.is_empty() {
            return Err(StoreError::InvalidRef(store_ref.to_string()));
        }
        let mut path = self.root.clone();
        for part in store_ref.split('/') {
            if part.is_empty() || part == "." || part == ".." {
                return Err(StoreError::InvalidRef(store_ref.to_string()));
            }
            path.push(part);
        }
        Ok(path)
    }
}

#[async_trait]
impl StoreBackend for DiskStore {
    fn kind(&self) -> &'static str {
        "disk"
    }

    async fn resolve_uri(&self, store_ref: &str) -> Result<StoreUri> {
        let path = self.object_path(store_ref)?;
        Ok(StoreUri {
            kind: self.kind().to_string(),
            value: path.to_string_lossy().into_owned(),
        })
    }

    async fn resolve_metadata(&self, store_ref: &str) -> Result<FileInfo> {
        let path = self.object_path(store_ref)?;
        let meta = match tokio::fs::metadata(&path).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::MissingObject(store_ref.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        if !meta.is_file() {
            return Err(StoreError::MissingObject(store_ref.to_string()));
        }

        let mime = mime_guess::from_path(&path)
            .first()
            .unwrap_or(mime::APPLICATION_OCTET_STREAM);
        Ok(FileInfo {
            size: meta.len() as i64,
            mime_type: mime.essence_str().to_string(),
            mime_type_info: serde_json::json!({
                "type": mime.type_().as_str(),
                "subtype": mime.subtype().as_str(),
            }),
        })
    }
}
