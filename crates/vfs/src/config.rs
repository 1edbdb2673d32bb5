/**
 * TOML configuration: where the database lives and which buckets exist.
 *
 * ```toml
 * database_path = "/var/lib/arbor/nodes.db"
 *
 * [[bucket]]
 * name = "files"
 *
 * [bucket.store]
 * type = "disk"
 * root = "/srv/objects"
 * ```
 */
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use store::{StoreConfig, StoreError};

use crate::bucket::{Bucket, Registry};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// SQLite database file; tests usually leave this unset and use an
    /// in-memory database instead
    pub database_path: Option<PathBuf>,

    /// Buckets to register, one `[[bucket]]` table each
    #[serde(default, rename = "bucket")]
    pub buckets: Vec<BucketConfig>,
}

/// One bucket: a name plus the backend serving it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketConfig {
    pub name: String,
    #[serde(default)]
    pub store: StoreConfig,
}

impl Config {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = tokio::fs::read_to_string(path).await?;
        Self::from_toml_str(&raw)
    }

    /// Build every configured backend and register it under its bucket
    /// name. Two buckets sharing a name is a configuration mistake, not a
    /// last-one-wins silent override.
    pub async fn build_registry(&self) -> Result<Registry, ConfigError> {
        let mut registry = Registry::new();
        for entry in &self.buckets {
            if registry.contains(&entry.name) {
                return Err(ConfigError::DuplicateBucket(entry.name.clone()));
            }
            let backend = entry
                .store
                .build()
                .await
                .map_err(|source| ConfigError::Store {
                    name: entry.name.clone(),
                    source,
                })?;
            debug!(bucket = %entry.name, kind = backend.kind(), "registered bucket");
            registry.insert(Bucket::new(&entry.name, backend));
        }
        Ok(registry)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("bucket configured more than once: {0}")]
    DuplicateBucket(String),

    #[error("bucket {name} store failed to build: {source}")]
    Store { name: String, source: StoreError },
}
