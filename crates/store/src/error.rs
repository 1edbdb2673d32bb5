//! Error types for the store backends.

/// Errors that can occur while resolving store refs against a backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Store ref is empty or would escape the backend root
    #[error("invalid store ref: {0}")]
    InvalidRef(String),

    /// No object behind the store ref
    #[error("object not found: {0}")]
    MissingObject(String),
}

/// Result type alias for backend operations.
pub type Result<T> = std::result::Result<T, StoreError>;
