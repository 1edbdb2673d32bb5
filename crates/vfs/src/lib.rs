/**
 * Named store backends ('buckets') and the registry
 *  that resolves bucket names for tree operations.
 */
pub mod bucket;
/**
 * The operation surface: one `Command` per
 *  (bucket, owner) pair, covering mkdir/put/mv/cp/rm,
 *  the stat family and the change feed.
 */
pub mod command;
/**
 * TOML configuration describing the database
 *  location and the bucket fleet.
 */
pub mod config;
/**
 * SQLite persistence: pool setup, migrations,
 *  the node row model and the column wrappers.
 */
pub mod database;
/**
 * Error taxonomy for tree operations.
 */
pub mod error;
/**
 * Path tokenizing, name validation and
 *  conflict-variant derivation.
 */
pub mod path;
/**
 * Tree mutation primitives: create, soft-delete
 *  cascade, reparent, and the ancestor-counter walk.
 */
pub(crate) mod tree;

pub mod prelude {
    pub use crate::bucket::{Bucket, Registry};
    pub use crate::command::{Command, ConflictMode, DeltaEntry, DeltaPage, DEFAULT_DELTA_LIMIT};
    pub use crate::config::{Config, ConfigError};
    pub use crate::database::models::{Node, Scope};
    pub use crate::database::types::{NodeId, Timestamp};
    pub use crate::database::{Database, DatabaseSetupError};
    pub use crate::error::VfsError;
}
