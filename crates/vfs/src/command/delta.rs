//! Cursor-paginated change feed over modification time.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::database::models::{Node, Scope};
use crate::database::types::{NodeId, Timestamp};
use crate::database::DatabaseConnection;

/// Page size used when callers have no opinion.
pub const DEFAULT_DELTA_LIMIT: usize = 100;

/// One change-feed line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeltaEntry {
    pub path: String,
    pub size: i64,
    pub is_dir: bool,
    pub modified_at: Timestamp,
}

/// One page of the change feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeltaPage {
    /// Stamp of the last entry; equals the request cursor on an empty page
    pub new_cursor: Timestamp,
    /// True iff a node stamped after `new_cursor` exists
    pub has_more: bool,
    pub entries: Vec<DeltaEntry>,
}

/// Fetch the node page after `cursor`: the nodes, the advanced cursor and
/// whether nodes remain beyond it.
///
/// Nominally `limit` nodes, but when the cut would split a group of rows
/// sharing one stamp the page is extended to the end of that group — the
/// cursor is a bare timestamp, so a split group could never be reached by
/// the next page.
pub(crate) async fn page_after(
    conn: &mut DatabaseConnection,
    scope: &Scope,
    cursor: Timestamp,
    limit: usize,
) -> Result<(Vec<Node>, Timestamp, bool), sqlx::Error> {
    if limit == 0 {
        let has_more = Node::exists_after(conn, scope, cursor).await?;
        return Ok((vec![], cursor, has_more));
    }

    let mut rows = Node::range_by_modified(conn, scope, cursor, limit as i64 + 1).await?;

    if rows.len() > limit {
        let overflow_stamp = rows[limit].modified_at;
        let last_stamp = rows[limit - 1].modified_at;
        rows.truncate(limit);
        if overflow_stamp == last_stamp {
            let have: HashSet<NodeId> = rows.iter().map(|n| n.id).collect();
            for node in Node::at_modified(conn, scope, last_stamp).await? {
                if !have.contains(&node.id) {
                    rows.push(node);
                }
            }
        }
    }

    let Some(last) = rows.last() else {
        return Ok((vec![], cursor, false));
    };
    let new_cursor = last.modified_at;
    let has_more = Node::exists_after(conn, scope, new_cursor).await?;
    Ok((rows, new_cursor, has_more))
}

/// Absolute path of a node, walking parent ids (removed ancestors
/// included) with a memo shared across one page.
pub(crate) async fn node_path(
    conn: &mut DatabaseConnection,
    memo: &mut HashMap<NodeId, String>,
    node: &Node,
) -> Result<String, sqlx::Error> {
    if let Some(known) = memo.get(&node.id) {
        return Ok(known.clone());
    }

    let mut chain = vec![(node.id, node.name.clone())];
    let mut base = String::new();
    let mut current = node.parent_id;
    while let Some(parent_id) = current {
        if let Some(known) = memo.get(&parent_id) {
            base = known.clone();
            break;
        }
        let parent = Node::get(conn, parent_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        current = parent.parent_id;
        chain.push((parent.id, parent.name));
    }

    let mut path = base;
    for (id, name) in chain.into_iter().rev() {
        path = format!("{}/{}", path, name);
        memo.insert(id, path.clone());
    }
    Ok(path)
}
