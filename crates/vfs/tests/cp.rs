//! Integration tests for cp

mod common;

use vfs::prelude::*;

#[tokio::test]
async fn test_cp_file_is_a_new_node() {
    let (command, backend) = common::setup_test_env().await;

    let source = common::put_file(&command, &backend, "/a/f.txt", 10).await;
    common::tick().await;

    let copy = command.cp("/a/f.txt", "/b/g.txt", ConflictMode::Default).await.unwrap();

    // Fresh identity and stamp; the source is untouched
    assert_ne!(copy.id, source.id);
    assert!(copy.modified_at > source.modified_at);
    assert!(command.exists("/a/f.txt").await.unwrap());
    assert!(command.exists("/b/g.txt").await.unwrap());
}

#[tokio::test]
async fn test_cp_shares_the_store_ref() {
    let (command, backend) = common::setup_test_env().await;

    common::put_file(&command, &backend, "/a/f.txt", 1234).await;
    command.cp("/a/f.txt", "/b/g.txt", ConflictMode::Default).await.unwrap();

    // Both nodes point at the same object
    assert_eq!(command.get_size("/b/g.txt").await.unwrap(), 1234);
    let uri = command.get_uri("/b/g.txt").await.unwrap();
    assert_eq!(uri.value, "ref:/a/f.txt");
}

#[tokio::test]
async fn test_cp_directory_is_shallow() {
    let (command, backend) = common::setup_test_env().await;

    command.mkdir("/a/b").await.unwrap();
    common::put_file(&command, &backend, "/a/b/x.txt", 1).await;

    let copy = command.cp("/a/b", "/c/b", ConflictMode::Default).await.unwrap();

    // The copy starts empty: no children, no inherited counter
    assert!(copy.is_dir);
    assert_eq!(command.get_count("/c/b").await.unwrap(), 0);
    assert!(command.ls("/c/b").await.unwrap().is_empty());
    assert!(!command.exists("/c/b/x.txt").await.unwrap());

    // The original keeps its subtree
    assert_eq!(command.get_count("/a/b").await.unwrap(), 1);
}

#[tokio::test]
async fn test_cp_missing_source_fails() {
    let (command, _) = common::setup_test_env().await;

    let result = command.cp("/ghost.txt", "/copy.txt", ConflictMode::Default).await;
    assert!(matches!(result, Err(VfsError::InvalidPath(_))));
}

#[tokio::test]
async fn test_cp_conflict_modes() {
    let (command, backend) = common::setup_test_env().await;

    common::put_file(&command, &backend, "/a/f.txt", 1).await;
    common::put_file(&command, &backend, "/b/f.txt", 2).await;
    common::tick().await;

    let result = command.cp("/a/f.txt", "/b/f.txt", ConflictMode::Default).await;
    assert!(matches!(result, Err(VfsError::FileNameConflict(_))));

    let renamed = command.cp("/a/f.txt", "/b/f.txt", ConflictMode::Rename).await.unwrap();
    assert_eq!(renamed.name, "f(1).txt");

    command.cp("/a/f.txt", "/b/f.txt", ConflictMode::Force).await.unwrap();
    assert_eq!(command.get_size("/b/f.txt").await.unwrap(), 1);

    // Occupant evicted, copy and rename variant remain
    assert_eq!(command.get_count("/b").await.unwrap(), 2);
}
