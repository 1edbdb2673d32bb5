//! Integration tests for ls

mod common;

use vfs::prelude::*;

#[tokio::test]
async fn test_ls_returns_absolute_paths_by_name() {
    let (command, backend) = common::setup_test_env().await;

    common::put_file(&command, &backend, "/a/z.txt", 1).await;
    command.mkdir("/a/sub").await.unwrap();
    common::put_file(&command, &backend, "/a/a.txt", 1).await;

    let listing = command.ls("/a").await.unwrap();
    assert_eq!(listing, vec!["/a/a.txt", "/a/sub", "/a/z.txt"]);
}

#[tokio::test]
async fn test_ls_lists_direct_children_only() {
    let (command, backend) = common::setup_test_env().await;

    command.mkdir("/a/b").await.unwrap();
    common::put_file(&command, &backend, "/a/b/deep.txt", 1).await;

    assert_eq!(command.ls("/a").await.unwrap(), vec!["/a/b"]);
    assert_eq!(command.ls("/a/b").await.unwrap(), vec!["/a/b/deep.txt"]);
}

#[tokio::test]
async fn test_ls_excludes_removed_children() {
    let (command, backend) = common::setup_test_env().await;

    common::put_file(&command, &backend, "/a/keep.txt", 1).await;
    common::put_file(&command, &backend, "/a/drop.txt", 1).await;
    command.rm("/a/drop.txt").await.unwrap();

    assert_eq!(command.ls("/a").await.unwrap(), vec!["/a/keep.txt"]);
}

#[tokio::test]
async fn test_ls_error_cases() {
    let (command, backend) = common::setup_test_env().await;

    common::put_file(&command, &backend, "/a/file.txt", 1).await;

    // Missing path
    let result = command.ls("/nowhere").await;
    assert!(matches!(result, Err(VfsError::InvalidPath(_))));

    // A file is not listable
    let result = command.ls("/a/file.txt").await;
    assert!(matches!(result, Err(VfsError::InvalidPath(_))));

    // The root is not a node
    let result = command.ls("/").await;
    assert!(matches!(result, Err(VfsError::InvalidPath(_))));
}
