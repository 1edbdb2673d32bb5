//! Name-collision policies for put, mv and cp destinations.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::database::models::{Node, Scope};
use crate::database::types::{NodeId, Timestamp};
use crate::database::DatabaseConnection;
use crate::error::VfsError;
use crate::path;
use crate::tree;

/// Rename-mode gives up after this many candidate names.
pub const RENAME_ATTEMPTS: u32 = 1000;

/// What to do when the destination (parent, name) is already occupied by
/// an active node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictMode {
    /// Fail with `FileNameConflict`, mutating nothing
    #[default]
    Default,
    /// Soft-delete the occupant (cascading), then take the name
    Force,
    /// Keep the occupant and pick a `name(n).ext` variant for the newcomer
    Rename,
}

/// Clear the destination name per `mode` and return the name the incoming
/// node should be saved under. Occupancy is judged by (parent, name) alone.
pub(crate) async fn resolve(
    conn: &mut DatabaseConnection,
    scope: &Scope,
    parent_id: Option<NodeId>,
    name: &str,
    mode: ConflictMode,
    stamp: Timestamp,
) -> Result<String, VfsError> {
    let occupant = match Node::find(conn, scope, parent_id, name).await? {
        Some(occupant) => occupant,
        None => return Ok(name.to_string()),
    };

    match mode {
        ConflictMode::Default => Err(VfsError::FileNameConflict(name.to_string())),
        ConflictMode::Force => {
            debug!(name = %name, evicted = %occupant.id, "force mode evicting occupant");
            tree::remove_subtree(conn, scope, &occupant, stamp).await?;
            Ok(name.to_string())
        }
        ConflictMode::Rename => {
            let mut candidate = name.to_string();
            for _ in 0..RENAME_ATTEMPTS {
                candidate = path::next_variant(&candidate);
                if Node::find(conn, scope, parent_id, &candidate)
                    .await?
                    .is_none()
                {
                    debug!(name = %name, renamed = %candidate, "rename mode picked variant");
                    return Ok(candidate);
                }
            }
            Err(VfsError::RenameLimit {
                name: name.to_string(),
                attempts: RENAME_ATTEMPTS,
            })
        }
    }
}
