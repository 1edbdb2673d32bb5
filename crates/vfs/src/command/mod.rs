/**
 * The (bucket, owner)-scoped operation surface.
 *
 * Every mutating operation takes one timestamp, runs inside one database
 * transaction, and either fully applies or leaves the tree untouched.
 * Reads run on the pool directly.
 */
mod conflict;
mod delta;

use std::collections::HashMap;

use tracing::debug;

use store::{FileInfo, StoreUri};

use crate::bucket::{Bucket, Registry};
use crate::database::models::{Node, Scope};
use crate::database::types::{NodeId, Timestamp};
use crate::database::{Database, DatabaseConnection};
use crate::error::VfsError;
use crate::path;
use crate::tree;

pub use conflict::{ConflictMode, RENAME_ATTEMPTS};
pub use delta::{DeltaEntry, DeltaPage, DEFAULT_DELTA_LIMIT};

/// Command façade bound to one (bucket, owner) pair.
///
/// Stateless beyond the binding: every operation re-derives its working
/// set from the scope. The bucket is resolved through the registry once,
/// here, so a misconfigured bucket fails construction rather than the
/// first operation.
#[derive(Debug, Clone)]
pub struct Command {
    db: Database,
    bucket: Bucket,
    scope: Scope,
}

impl Command {
    pub fn new(
        db: Database,
        registry: &Registry,
        bucket: &str,
        owner_id: impl Into<String>,
    ) -> Result<Self, VfsError> {
        let bucket = registry.get(bucket)?;
        let scope = Scope::new(bucket.name(), owner_id);
        Ok(Self { db, bucket, scope })
    }

    pub fn bucket(&self) -> &Bucket {
        &self.bucket
    }

    pub fn owner_id(&self) -> &str {
        &self.scope.owner_id
    }

    /// Create every missing directory along `path` and return the terminal
    /// one. Reuses existing directories, so repeated calls are idempotent.
    /// A component occupied by a file fails `FileNameConflict`.
    pub async fn mkdir(&self, path: &str) -> Result<Node, VfsError> {
        debug!(path = %path, "mkdir");
        let tokens = path::tokenize(path);
        if tokens.is_empty() {
            return Err(VfsError::InvalidPath(path.to_string()));
        }

        let stamp = Timestamp::now();
        let mut tx = self.db.begin().await?;
        let node = self.mkdir_tokens(&mut tx, &tokens, stamp).await?;
        tx.commit().await?;
        Ok(node)
    }

    /// Create a file node at `path` pointing at `store_ref`, making parent
    /// directories as needed and resolving a destination collision per
    /// `mode`.
    pub async fn put(&self, path: &str, store_ref: &str, mode: ConflictMode) -> Result<Node, VfsError> {
        debug!(path = %path, store_ref = %store_ref, ?mode, "put");
        let tokens = path::tokenize(path);
        let Some((name, dir_tokens)) = tokens.split_last() else {
            return Err(VfsError::InvalidPath(path.to_string()));
        };

        let stamp = Timestamp::now();
        let mut tx = self.db.begin().await?;
        let parent_id = self.ensure_parent(&mut tx, dir_tokens, stamp).await?;
        let name = conflict::resolve(&mut tx, &self.scope, parent_id, name, mode, stamp).await?;
        let node = tree::create(
            &mut tx,
            &self.scope,
            parent_id,
            &name,
            false,
            Some(store_ref.to_string()),
            stamp,
        )
        .await?;
        tx.commit().await?;
        Ok(node)
    }

    /// True iff an active node resolves at `path`.
    pub async fn exists(&self, path: &str) -> Result<bool, VfsError> {
        let tokens = path::tokenize(path);
        let mut conn = self.db.acquire().await?;
        Ok(self.resolve(&mut conn, &tokens).await?.is_some())
    }

    /// Absolute paths of a directory's direct active children, ordered by
    /// name. Fails `InvalidPath` when `path` is missing or not a directory.
    pub async fn ls(&self, path: &str) -> Result<Vec<String>, VfsError> {
        let tokens = path::tokenize(path);
        let mut conn = self.db.acquire().await?;
        let dir = self
            .resolve(&mut conn, &tokens)
            .await?
            .filter(|n| n.is_dir)
            .ok_or_else(|| VfsError::InvalidPath(path.to_string()))?;

        let base = path::join(&tokens);
        let children = Node::children(&mut conn, &self.scope, Some(dir.id)).await?;
        Ok(children
            .into_iter()
            .map(|child| format!("{}/{}", base, child.name))
            .collect())
    }

    /// Soft-delete the node at `path`, cascading through a directory's
    /// subtree. Missing paths are a no-op.
    pub async fn rm(&self, path: &str) -> Result<(), VfsError> {
        debug!(path = %path, "rm");
        let tokens = path::tokenize(path);
        let stamp = Timestamp::now();
        let mut tx = self.db.begin().await?;
        if let Some(node) = self.resolve(&mut tx, &tokens).await? {
            tree::remove_subtree(&mut tx, &self.scope, &node, stamp).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Move the node at `from` to `to`, conflict-resolved per `mode`. The
    /// node keeps its identity; parents of `to` are created as needed.
    /// Moving a node into its own subtree (or onto itself) fails
    /// `InvalidPath` before anything is touched.
    pub async fn mv(&self, from: &str, to: &str, mode: ConflictMode) -> Result<Node, VfsError> {
        debug!(from = %from, to = %to, ?mode, "mv");
        let from_tokens = path::tokenize(from);
        let to_tokens = path::tokenize(to);
        if from_tokens.is_empty() {
            return Err(VfsError::InvalidPath(from.to_string()));
        }
        let Some((to_name, to_dir)) = to_tokens.split_last() else {
            return Err(VfsError::InvalidPath(to.to_string()));
        };
        if to_tokens.starts_with(&from_tokens) {
            return Err(VfsError::InvalidPath(to.to_string()));
        }

        let stamp = Timestamp::now();
        let mut tx = self.db.begin().await?;
        let source = self
            .resolve(&mut tx, &from_tokens)
            .await?
            .ok_or_else(|| VfsError::InvalidPath(from.to_string()))?;

        let parent_id = self.ensure_parent(&mut tx, to_dir, stamp).await?;
        let name = conflict::resolve(&mut tx, &self.scope, parent_id, to_name, mode, stamp).await?;
        let moved = tree::reparent(&mut tx, &source, parent_id, &name, stamp).await?;
        tx.commit().await?;
        Ok(moved)
    }

    /// Copy the node at `from` to `to` as a brand-new node (fresh id and
    /// stamp). A directory copy is shallow: the copy starts empty, so its
    /// descendant count is zero.
    pub async fn cp(&self, from: &str, to: &str, mode: ConflictMode) -> Result<Node, VfsError> {
        debug!(from = %from, to = %to, ?mode, "cp");
        let from_tokens = path::tokenize(from);
        let to_tokens = path::tokenize(to);
        if from_tokens.is_empty() {
            return Err(VfsError::InvalidPath(from.to_string()));
        }
        let Some((to_name, to_dir)) = to_tokens.split_last() else {
            return Err(VfsError::InvalidPath(to.to_string()));
        };

        let stamp = Timestamp::now();
        let mut tx = self.db.begin().await?;
        let source = self
            .resolve(&mut tx, &from_tokens)
            .await?
            .ok_or_else(|| VfsError::InvalidPath(from.to_string()))?;

        let parent_id = self.ensure_parent(&mut tx, to_dir, stamp).await?;
        let name = conflict::resolve(&mut tx, &self.scope, parent_id, to_name, mode, stamp).await?;
        let copy = tree::create(
            &mut tx,
            &self.scope,
            parent_id,
            &name,
            source.is_dir,
            source.store_ref.clone(),
            stamp,
        )
        .await?;
        tx.commit().await?;
        Ok(copy)
    }

    pub async fn is_dir(&self, path: &str) -> Result<bool, VfsError> {
        Ok(self.require_node(path).await?.is_dir)
    }

    pub async fn is_file(&self, path: &str) -> Result<bool, VfsError> {
        Ok(!self.require_node(path).await?.is_dir)
    }

    /// Object size for a file (from the backend), 0 for a directory.
    pub async fn get_size(&self, path: &str) -> Result<i64, VfsError> {
        let node = self.require_node(path).await?;
        self.node_size(&node).await
    }

    /// Number of active nodes beneath a directory, 0 for a file.
    pub async fn get_count(&self, path: &str) -> Result<i64, VfsError> {
        let node = self.require_node(path).await?;
        if node.is_dir {
            Ok(node.descendant_count)
        } else {
            Ok(0)
        }
    }

    /// Modification stamp of the node at `path`, resolving through removed
    /// nodes as well.
    pub async fn get_last_modified(&self, path: &str) -> Result<Timestamp, VfsError> {
        let tokens = path::tokenize(path);
        let mut conn = self.db.acquire().await?;
        let node = self
            .resolve_any(&mut conn, &tokens)
            .await?
            .ok_or_else(|| VfsError::InvalidPath(path.to_string()))?;
        Ok(node.modified_at)
    }

    /// Backend URI for the file at `path`.
    pub async fn get_uri(&self, path: &str) -> Result<StoreUri, VfsError> {
        let node = self.require_file(path).await?;
        let store_ref = node_store_ref(&node)?;
        Ok(self.bucket.get_uri(store_ref).await?)
    }

    /// Backend size/mime metadata for the file at `path`.
    pub async fn file_info(&self, path: &str) -> Result<FileInfo, VfsError> {
        let node = self.require_file(path).await?;
        let store_ref = node_store_ref(&node)?;
        Ok(self.bucket.file_info(store_ref).await?)
    }

    /// Change-feed page: every node (removed included) stamped after
    /// `cursor`, ascending, nominally `limit` entries. See
    /// [`DeltaPage`] for the cursor/tie-group contract.
    pub async fn delta(&self, cursor: Timestamp, limit: usize) -> Result<DeltaPage, VfsError> {
        debug!(cursor = %cursor, limit = limit, "delta");
        let mut conn = self.db.acquire().await?;
        let (nodes, new_cursor, has_more) =
            delta::page_after(&mut conn, &self.scope, cursor, limit).await?;

        let mut memo = HashMap::new();
        let mut entries = Vec::with_capacity(nodes.len());
        for node in &nodes {
            let path = delta::node_path(&mut conn, &mut memo, node).await?;
            let size = self.node_size(node).await?;
            entries.push(DeltaEntry {
                path,
                size,
                is_dir: node.is_dir,
                modified_at: node.modified_at,
            });
        }
        Ok(DeltaPage {
            new_cursor,
            has_more,
            entries,
        })
    }

    /// Walk `tokens` through active nodes; `None` as soon as a component
    /// is missing. The empty path resolves to no node.
    async fn resolve(
        &self,
        conn: &mut DatabaseConnection,
        tokens: &[&str],
    ) -> Result<Option<Node>, sqlx::Error> {
        let mut current: Option<Node> = None;
        for token in tokens {
            let parent_id = current.as_ref().map(|n| n.id);
            match Node::find(&mut *conn, &self.scope, parent_id, token).await? {
                Some(node) => current = Some(node),
                None => return Ok(None),
            }
        }
        Ok(current)
    }

    /// Like `resolve`, but willing to step through removed nodes.
    async fn resolve_any(
        &self,
        conn: &mut DatabaseConnection,
        tokens: &[&str],
    ) -> Result<Option<Node>, sqlx::Error> {
        let mut current: Option<Node> = None;
        for token in tokens {
            let parent_id = current.as_ref().map(|n| n.id);
            match Node::find_any(&mut *conn, &self.scope, parent_id, token).await? {
                Some(node) => current = Some(node),
                None => return Ok(None),
            }
        }
        Ok(current)
    }

    /// Resolve an active node or fail `InvalidPath`.
    async fn require_node(&self, path: &str) -> Result<Node, VfsError> {
        let tokens = path::tokenize(path);
        let mut conn = self.db.acquire().await?;
        self.resolve(&mut conn, &tokens)
            .await?
            .ok_or_else(|| VfsError::InvalidPath(path.to_string()))
    }

    /// Resolve an active file or fail `InvalidPath`.
    async fn require_file(&self, path: &str) -> Result<Node, VfsError> {
        let node = self.require_node(path).await?;
        if node.is_dir {
            return Err(VfsError::InvalidPath(path.to_string()));
        }
        Ok(node)
    }

    /// find-or-create walk for every token, as directories.
    async fn mkdir_tokens(
        &self,
        conn: &mut DatabaseConnection,
        tokens: &[&str],
        stamp: Timestamp,
    ) -> Result<Node, VfsError> {
        let mut current: Option<Node> = None;
        for token in tokens {
            let parent_id = current.as_ref().map(|n| n.id);
            let next = match Node::find(&mut *conn, &self.scope, parent_id, token).await? {
                Some(node) if node.is_dir => node,
                Some(node) => return Err(VfsError::FileNameConflict(node.name)),
                None => {
                    tree::create(&mut *conn, &self.scope, parent_id, token, true, None, stamp)
                        .await?
                }
            };
            current = Some(next);
        }
        current.ok_or_else(|| VfsError::InvalidPath(path::join(tokens)))
    }

    /// Parent node id for a destination: `None` for toplevel, otherwise the
    /// terminal directory of a mkdir walk.
    async fn ensure_parent(
        &self,
        conn: &mut DatabaseConnection,
        dir_tokens: &[&str],
        stamp: Timestamp,
    ) -> Result<Option<NodeId>, VfsError> {
        if dir_tokens.is_empty() {
            return Ok(None);
        }
        let dir = self.mkdir_tokens(conn, dir_tokens, stamp).await?;
        Ok(Some(dir.id))
    }

    /// Size as the change feed and `get_size` define it.
    async fn node_size(&self, node: &Node) -> Result<i64, VfsError> {
        if node.is_dir {
            return Ok(0);
        }
        let store_ref = node_store_ref(node)?;
        let info = self.bucket.file_info(store_ref).await?;
        Ok(info.size)
    }
}

/// A file node's store ref. Absence on a file row means the tree and the
/// backend disagree about the node, which reads as a store fault.
fn node_store_ref(node: &Node) -> Result<&str, VfsError> {
    node.store_ref
        .as_deref()
        .ok_or_else(|| VfsError::InvalidStore(format!("file node {} has no store ref", node.id)))
}
