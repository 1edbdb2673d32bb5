//! Error surface of the command layer.

/// Errors surfaced by Command operations.
#[derive(Debug, thiserror::Error)]
pub enum VfsError {
    /// Unknown bucket, or a node whose backend association is broken
    #[error("invalid store: {0}")]
    InvalidStore(String),

    /// Path does not resolve, or resolves to the wrong kind of node
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// An active node already occupies the destination name
    #[error("file name conflict: {0}")]
    FileNameConflict(String),

    /// Rename-mode conflict resolution ran out of attempts
    #[error("no free name variant for '{name}' within {attempts} attempts")]
    RenameLimit { name: String, attempts: u32 },

    /// Empty name or forbidden characters
    #[error("invalid node name: {0:?}")]
    Name(String),

    /// Database error
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Store backend error
    #[error("store backend error: {0}")]
    Store(#[from] store::StoreError),
}
