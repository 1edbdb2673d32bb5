//! Pluggable content-store backends.
//!
//! A backend answers two questions about an opaque store ref: where the
//! object lives (a kind/value URI) and what it is (size + mime metadata).
//! Object bytes are never served here; the virtual file system layer above
//! only tracks metadata about where bytes live.
//!
//! Backends are constructed from a serde-tagged [`StoreConfig`], so a
//! configuration file can declare which backend a bucket binds to.

mod backend;
mod disk;
mod error;
mod memory;

pub use backend::{FileInfo, StoreBackend, StoreConfig, StoreUri};
pub use disk::DiskStore;
pub use error::{Result, StoreError};
pub use memory::MemoryStore;
