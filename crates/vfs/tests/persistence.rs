//! Tree state survives reopening the database file

mod common;

use std::sync::Arc;

use store::MemoryStore;
use tempfile::TempDir;
use vfs::prelude::*;

fn test_registry(backend: &MemoryStore) -> Registry {
    let mut registry = Registry::new();
    registry.insert(Bucket::new("test", Arc::new(backend.clone())));
    registry
}

#[tokio::test]
async fn test_tree_survives_reopen() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("nodes.db");
    let backend = MemoryStore::new();
    backend.insert("ref:f", 1, "text/plain");
    backend.insert("ref:g", 2, "text/plain");
    let registry = test_registry(&backend);

    {
        let db = Database::connect(&db_path).await.unwrap();
        let command = Command::new(db, &registry, "test", common::OWNER).unwrap();

        command.mkdir("/a/b").await.unwrap();
        command.put("/a/b/f.txt", "ref:f", ConflictMode::Default).await.unwrap();
        command.rm("/a/b/f.txt").await.unwrap();
        command.put("/a/b/g.txt", "ref:g", ConflictMode::Default).await.unwrap();
    }

    // Reopen the same file with a fresh pool
    let db = Database::connect(&db_path).await.unwrap();
    let command = Command::new(db, &registry, "test", common::OWNER).unwrap();

    assert!(command.is_dir("/a/b").await.unwrap());
    assert!(command.exists("/a/b/g.txt").await.unwrap());
    assert!(!command.exists("/a/b/f.txt").await.unwrap());
    assert_eq!(command.get_count("/a").await.unwrap(), 2);
    assert_eq!(command.ls("/a/b").await.unwrap(), vec!["/a/b/g.txt"]);

    // The feed and its cursors survive too
    let page = command.delta(Timestamp::EPOCH, 10).await.unwrap();
    assert!(!page.entries.is_empty());
    assert!(!page.has_more);
}

#[tokio::test]
async fn test_connect_creates_parent_directories() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("deep/nested/nodes.db");

    let db = Database::connect(&db_path).await.unwrap();
    let command = Command::new(db, &test_registry(&MemoryStore::new()), "test", common::OWNER)
        .unwrap();

    command.mkdir("/a").await.unwrap();
    assert!(db_path.exists());
}
