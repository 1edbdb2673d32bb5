//! Tree mutation primitives.
//!
//! Every mutation here is one explicit sequence: write the node, then walk
//! the ancestor chain adjusting `descendant_count`. Callers run these inside
//! a single transaction per command operation, so a failed walk rolls the
//! whole mutation back instead of leaving ancestors half-updated.

use tracing::debug;

use crate::database::models::{Node, Scope};
use crate::database::types::{NodeId, Timestamp};
use crate::database::DatabaseConnection;
use crate::error::VfsError;
use crate::path;

/// Create an active node under `parent_id` and bump every ancestor's
/// descendant count by one.
pub(crate) async fn create(
    conn: &mut DatabaseConnection,
    scope: &Scope,
    parent_id: Option<NodeId>,
    name: &str,
    is_dir: bool,
    store_ref: Option<String>,
    stamp: Timestamp,
) -> Result<Node, VfsError> {
    if !path::valid_name(name) {
        return Err(VfsError::Name(name.to_string()));
    }

    let node = Node {
        id: NodeId::new(),
        bucket: scope.bucket.clone(),
        owner_id: scope.owner_id.clone(),
        parent_id,
        name: name.to_string(),
        is_dir,
        store_ref,
        removed: false,
        descendant_count: 0,
        modified_at: stamp,
    };
    Node::insert(conn, &node).await?;
    propagate(conn, parent_id, 1, stamp).await?;

    debug!(id = %node.id, name = %node.name, is_dir = is_dir, "created node");
    Ok(node)
}

/// Walk the ancestor chain from `from` to the root, adding `delta` to each
/// directory's descendant count and refreshing its stamp.
pub(crate) async fn propagate(
    conn: &mut DatabaseConnection,
    from: Option<NodeId>,
    delta: i64,
    stamp: Timestamp,
) -> Result<(), sqlx::Error> {
    let mut current = from;
    while let Some(id) = current {
        let node = Node::get(conn, id).await?.ok_or(sqlx::Error::RowNotFound)?;
        Node::add_descendants(conn, id, delta, stamp).await?;
        current = node.parent_id;
    }
    Ok(())
}

/// Soft-delete a node and everything beneath it.
///
/// The ancestor chain is decremented once, by the whole subtree size;
/// descendants then only flip their removed flag and refresh their stamp.
/// Removing an already-removed node is a no-op.
pub(crate) async fn remove_subtree(
    conn: &mut DatabaseConnection,
    scope: &Scope,
    node: &Node,
    stamp: Timestamp,
) -> Result<(), sqlx::Error> {
    if node.removed {
        return Ok(());
    }

    Node::mark_removed(conn, node.id, stamp).await?;
    propagate(conn, node.parent_id, -(node.descendant_count + 1), stamp).await?;
    debug!(id = %node.id, name = %node.name, subtree = node.descendant_count + 1, "removed node");

    if !node.is_dir {
        return Ok(());
    }
    let mut stack = vec![node.id];
    while let Some(dir_id) = stack.pop() {
        for child in Node::children(conn, scope, Some(dir_id)).await? {
            Node::mark_removed(conn, child.id, stamp).await?;
            if child.is_dir {
                stack.push(child.id);
            }
        }
    }
    Ok(())
}

/// Move a node to (`new_parent`, `new_name`), keeping its identity.
///
/// A move under a different parent keeps the node's own stamp and shifts
/// the subtree size from the old chain to the new one; a rename within the
/// same parent refreshes the stamp and moves no counts.
pub(crate) async fn reparent(
    conn: &mut DatabaseConnection,
    node: &Node,
    new_parent: Option<NodeId>,
    new_name: &str,
    stamp: Timestamp,
) -> Result<Node, VfsError> {
    if !path::valid_name(new_name) {
        return Err(VfsError::Name(new_name.to_string()));
    }

    if node.parent_id == new_parent {
        Node::set_name(conn, node.id, new_name, stamp).await?;
    } else {
        Node::set_parent_name(conn, node.id, new_parent, new_name).await?;
        let subtree = node.descendant_count + 1;
        propagate(conn, node.parent_id, -subtree, stamp).await?;
        propagate(conn, new_parent, subtree, stamp).await?;
    }

    debug!(id = %node.id, name = %new_name, "moved node");
    Node::get(conn, node.id)
        .await?
        .ok_or(VfsError::Database(sqlx::Error::RowNotFound))
}
