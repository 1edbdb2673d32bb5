use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::types::{NodeId, Timestamp};
use crate::database::DatabaseConnection;

/// The (bucket, owner) pair every tree query is scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub bucket: String,
    pub owner_id: String,
}

impl Scope {
    pub fn new(bucket: impl Into<String>, owner_id: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            owner_id: owner_id.into(),
        }
    }
}

/// One row of the virtual tree. A node references its parent by id;
/// listings are derived by querying for that id, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Node {
    pub id: NodeId,
    pub bucket: String,
    pub owner_id: String,
    pub parent_id: Option<NodeId>,
    pub name: String,
    pub is_dir: bool,
    pub store_ref: Option<String>,
    pub removed: bool,
    pub descendant_count: i64,
    pub modified_at: Timestamp,
}

impl Node {
    /// Insert the row as-is.
    pub async fn insert(conn: &mut DatabaseConnection, node: &Node) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO nodes (
                id, bucket, owner_id, parent_id, name, is_dir,
                store_ref, removed, descendant_count, modified_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(node.id)
        .bind(node.bucket.as_str())
        .bind(node.owner_id.as_str())
        .bind(node.parent_id)
        .bind(node.name.as_str())
        .bind(node.is_dir)
        .bind(node.store_ref.as_deref())
        .bind(node.removed)
        .bind(node.descendant_count)
        .bind(node.modified_at)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Get a node by id, whatever its removed state.
    pub async fn get(
        conn: &mut DatabaseConnection,
        id: NodeId,
    ) -> Result<Option<Node>, sqlx::Error> {
        sqlx::query_as::<_, Node>(
            r#"
            SELECT
                id, bucket, owner_id, parent_id, name, is_dir,
                store_ref, removed, descendant_count, modified_at
            FROM nodes
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await
    }

    /// Find the active child named `name` under `parent_id` (NULL for
    /// toplevel).
    pub async fn find(
        conn: &mut DatabaseConnection,
        scope: &Scope,
        parent_id: Option<NodeId>,
        name: &str,
    ) -> Result<Option<Node>, sqlx::Error> {
        sqlx::query_as::<_, Node>(
            r#"
            SELECT
                id, bucket, owner_id, parent_id, name, is_dir,
                store_ref, removed, descendant_count, modified_at
            FROM nodes
            WHERE bucket = ?1 AND owner_id = ?2
              AND parent_id IS ?3 AND name = ?4 AND removed = 0
            "#,
        )
        .bind(scope.bucket.as_str())
        .bind(scope.owner_id.as_str())
        .bind(parent_id)
        .bind(name)
        .fetch_optional(conn)
        .await
    }

    /// Find a child including removed rows. An active match wins over
    /// removed ones; among removed matches the most recently modified wins.
    pub async fn find_any(
        conn: &mut DatabaseConnection,
        scope: &Scope,
        parent_id: Option<NodeId>,
        name: &str,
    ) -> Result<Option<Node>, sqlx::Error> {
        sqlx::query_as::<_, Node>(
            r#"
            SELECT
                id, bucket, owner_id, parent_id, name, is_dir,
                store_ref, removed, descendant_count, modified_at
            FROM nodes
            WHERE bucket = ?1 AND owner_id = ?2
              AND parent_id IS ?3 AND name = ?4
            ORDER BY removed ASC, modified_at DESC
            LIMIT 1
            "#,
        )
        .bind(scope.bucket.as_str())
        .bind(scope.owner_id.as_str())
        .bind(parent_id)
        .bind(name)
        .fetch_optional(conn)
        .await
    }

    /// Active children of a directory (NULL for toplevel), ordered by name.
    pub async fn children(
        conn: &mut DatabaseConnection,
        scope: &Scope,
        parent_id: Option<NodeId>,
    ) -> Result<Vec<Node>, sqlx::Error> {
        sqlx::query_as::<_, Node>(
            r#"
            SELECT
                id, bucket, owner_id, parent_id, name, is_dir,
                store_ref, removed, descendant_count, modified_at
            FROM nodes
            WHERE bucket = ?1 AND owner_id = ?2
              AND parent_id IS ?3 AND removed = 0
            ORDER BY name ASC
            "#,
        )
        .bind(scope.bucket.as_str())
        .bind(scope.owner_id.as_str())
        .bind(parent_id)
        .fetch_all(conn)
        .await
    }

    /// Nodes modified strictly after `after`, removed rows included,
    /// ascending by (modified_at, insertion order).
    pub async fn range_by_modified(
        conn: &mut DatabaseConnection,
        scope: &Scope,
        after: Timestamp,
        limit: i64,
    ) -> Result<Vec<Node>, sqlx::Error> {
        sqlx::query_as::<_, Node>(
            r#"
            SELECT
                id, bucket, owner_id, parent_id, name, is_dir,
                store_ref, removed, descendant_count, modified_at
            FROM nodes
            WHERE bucket = ?1 AND owner_id = ?2 AND modified_at > ?3
            ORDER BY modified_at ASC, rowid ASC
            LIMIT ?4
            "#,
        )
        .bind(scope.bucket.as_str())
        .bind(scope.owner_id.as_str())
        .bind(after)
        .bind(limit)
        .fetch_all(conn)
        .await
    }

    /// Every node stamped exactly `at`, in insertion order. Used to keep a
    /// change-feed page from splitting a timestamp tie group.
    pub async fn at_modified(
        conn: &mut DatabaseConnection,
        scope: &Scope,
        at: Timestamp,
    ) -> Result<Vec<Node>, sqlx::Error> {
        sqlx::query_as::<_, Node>(
            r#"
            SELECT
                id, bucket, owner_id, parent_id, name, is_dir,
                store_ref, removed, descendant_count, modified_at
            FROM nodes
            WHERE bucket = ?1 AND owner_id = ?2 AND modified_at = ?3
            ORDER BY rowid ASC
            "#,
        )
        .bind(scope.bucket.as_str())
        .bind(scope.owner_id.as_str())
        .bind(at)
        .fetch_all(conn)
        .await
    }

    /// True iff any node (removed included) is stamped after `after`.
    pub async fn exists_after(
        conn: &mut DatabaseConnection,
        scope: &Scope,
        after: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM nodes
                WHERE bucket = ?1 AND owner_id = ?2 AND modified_at > ?3
            )
            "#,
        )
        .bind(scope.bucket.as_str())
        .bind(scope.owner_id.as_str())
        .bind(after)
        .fetch_one(conn)
        .await
    }

    /// Adjust a directory's descendant count and refresh its stamp.
    pub async fn add_descendants(
        conn: &mut DatabaseConnection,
        id: NodeId,
        delta: i64,
        stamp: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE nodes
            SET descendant_count = descendant_count + ?2, modified_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(delta)
        .bind(stamp)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Soft-delete one row. Removal always refreshes the stamp.
    pub async fn mark_removed(
        conn: &mut DatabaseConnection,
        id: NodeId,
        stamp: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE nodes
            SET removed = 1, modified_at = ?2
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(stamp)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Rename in place. A name change refreshes the stamp.
    pub async fn set_name(
        conn: &mut DatabaseConnection,
        id: NodeId,
        name: &str,
        stamp: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE nodes
            SET name = ?2, modified_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(stamp)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Reparent (and possibly rename) without touching the stamp: moving a
    /// node under a new parent does not count as modifying it.
    pub async fn set_parent_name(
        conn: &mut DatabaseConnection,
        id: NodeId,
        parent_id: Option<NodeId>,
        name: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE nodes
            SET parent_id = ?2, name = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(parent_id)
        .bind(name)
        .execute(conn)
        .await?;
        Ok(())
    }
}
