//! Shared test utilities for command integration tests
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use store::MemoryStore;
use vfs::prelude::*;

pub const OWNER: &str = "owner-1";

/// Set up a test environment: in-memory database, one memory-backed
/// bucket named "test", and a command bound to it.
pub async fn setup_test_env() -> (Command, MemoryStore) {
    let db = Database::in_memory().await.unwrap();

    let backend = MemoryStore::new();
    let mut registry = Registry::new();
    registry.insert(Bucket::new("test", Arc::new(backend.clone())));

    let command = Command::new(db, &registry, "test", OWNER).unwrap();
    (command, backend)
}

/// Seed an object sized `size` and put a file node for it at `path`.
pub async fn put_file(command: &Command, backend: &MemoryStore, path: &str, size: i64) -> Node {
    let store_ref = format!("ref:{path}");
    backend.insert(&store_ref, size, "application/octet-stream");
    command
        .put(path, &store_ref, ConflictMode::Default)
        .await
        .unwrap()
}

/// Sleep long enough that the next operation lands on a later stamp.
pub async fn tick() {
    tokio::time::sleep(Duration::from_millis(2)).await;
}
