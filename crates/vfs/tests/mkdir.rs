//! Integration tests for mkdir

mod common;

use vfs::prelude::*;

#[tokio::test]
async fn test_mkdir_creates_chain() {
    let (command, _) = common::setup_test_env().await;

    let leaf = command.mkdir("/a/b/c").await.unwrap();
    assert!(leaf.is_dir);
    assert_eq!(leaf.name, "c");

    // Every level exists and is a directory
    for path in ["/a", "/a/b", "/a/b/c"] {
        assert!(command.exists(path).await.unwrap());
        assert!(command.is_dir(path).await.unwrap());
    }

    // Counters aggregate the whole subtree
    assert_eq!(command.get_count("/a").await.unwrap(), 2);
    assert_eq!(command.get_count("/a/b").await.unwrap(), 1);
    assert_eq!(command.get_count("/a/b/c").await.unwrap(), 0);
}

#[tokio::test]
async fn test_mkdir_is_idempotent() {
    let (command, _) = common::setup_test_env().await;

    let first = command.mkdir("/a/b").await.unwrap();
    common::tick().await;
    let second = command.mkdir("/a/b").await.unwrap();

    // Same node both times, nothing new created
    assert_eq!(first.id, second.id);
    assert_eq!(command.get_count("/a").await.unwrap(), 1);
}

#[tokio::test]
async fn test_mkdir_reuses_existing_prefix() {
    let (command, _) = common::setup_test_env().await;

    command.mkdir("/a/b").await.unwrap();
    command.mkdir("/a/b/c/d").await.unwrap();

    assert_eq!(command.get_count("/a").await.unwrap(), 3);
    assert_eq!(command.get_count("/a/b").await.unwrap(), 2);
}

#[tokio::test]
async fn test_mkdir_over_file_fails() {
    let (command, backend) = common::setup_test_env().await;

    common::put_file(&command, &backend, "/notes.txt", 10).await;

    let result = command.mkdir("/notes.txt").await;
    assert!(matches!(result, Err(VfsError::FileNameConflict(_))));

    // A file in the middle of the chain fails the same way
    let result = command.mkdir("/notes.txt/sub").await;
    assert!(matches!(result, Err(VfsError::FileNameConflict(_))));
}

#[tokio::test]
async fn test_mkdir_empty_path_fails() {
    let (command, _) = common::setup_test_env().await;

    let result = command.mkdir("/").await;
    assert!(matches!(result, Err(VfsError::InvalidPath(_))));
}

#[tokio::test]
async fn test_mkdir_rejects_forbidden_characters() {
    let (command, _) = common::setup_test_env().await;

    let result = command.mkdir("/bad:name").await;
    assert!(matches!(result, Err(VfsError::Name(_))));

    // Nothing was created along the way
    assert!(!command.exists("/bad:name").await.unwrap());
}
