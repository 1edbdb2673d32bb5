//! Integration tests for the stat family: exists, is_dir/is_file,
//! get_size, get_count, get_last_modified, get_uri, file_info

mod common;

use vfs::prelude::*;

#[tokio::test]
async fn test_exists() {
    let (command, backend) = common::setup_test_env().await;

    command.mkdir("/a").await.unwrap();
    common::put_file(&command, &backend, "/a/f.txt", 1).await;

    assert!(command.exists("/a").await.unwrap());
    assert!(command.exists("/a/f.txt").await.unwrap());
    assert!(!command.exists("/a/ghost").await.unwrap());
    assert!(!command.exists("/").await.unwrap());
}

#[tokio::test]
async fn test_is_dir_and_is_file() {
    let (command, backend) = common::setup_test_env().await;

    command.mkdir("/dir").await.unwrap();
    common::put_file(&command, &backend, "/file.txt", 1).await;

    assert!(command.is_dir("/dir").await.unwrap());
    assert!(!command.is_file("/dir").await.unwrap());
    assert!(command.is_file("/file.txt").await.unwrap());
    assert!(!command.is_dir("/file.txt").await.unwrap());

    let result = command.is_dir("/ghost").await;
    assert!(matches!(result, Err(VfsError::InvalidPath(_))));
}

#[tokio::test]
async fn test_get_size() {
    let (command, backend) = common::setup_test_env().await;

    command.mkdir("/dir").await.unwrap();
    common::put_file(&command, &backend, "/img.png", 4096).await;

    // Files answer from backend metadata, directories are always 0
    assert_eq!(command.get_size("/img.png").await.unwrap(), 4096);
    assert_eq!(command.get_size("/dir").await.unwrap(), 0);
}

#[tokio::test]
async fn test_get_size_unseeded_object_fails() {
    let (command, _) = common::setup_test_env().await;

    command.put("/f.txt", "ref:unseeded", ConflictMode::Default).await.unwrap();

    let result = command.get_size("/f.txt").await;
    assert!(matches!(result, Err(VfsError::Store(_))));
}

#[tokio::test]
async fn test_get_count() {
    let (command, backend) = common::setup_test_env().await;

    command.mkdir("/a/b/c").await.unwrap();
    common::put_file(&command, &backend, "/a/b/one.txt", 1).await;
    common::put_file(&command, &backend, "/a/b/c/two.txt", 1).await;
    common::put_file(&command, &backend, "/a/three.txt", 1).await;

    assert_eq!(command.get_count("/a").await.unwrap(), 5);
    assert_eq!(command.get_count("/a/b").await.unwrap(), 3);
    assert_eq!(command.get_count("/a/b/c").await.unwrap(), 1);

    // Files always count 0
    assert_eq!(command.get_count("/a/three.txt").await.unwrap(), 0);
}

#[tokio::test]
async fn test_get_last_modified() {
    let (command, backend) = common::setup_test_env().await;

    let node = common::put_file(&command, &backend, "/a/f.txt", 1).await;

    assert_eq!(command.get_last_modified("/a/f.txt").await.unwrap(), node.modified_at);

    let result = command.get_last_modified("/ghost").await;
    assert!(matches!(result, Err(VfsError::InvalidPath(_))));
}

#[tokio::test]
async fn test_creating_children_refreshes_ancestor_stamps() {
    let (command, backend) = common::setup_test_env().await;

    command.mkdir("/a").await.unwrap();
    let before = command.get_last_modified("/a").await.unwrap();
    common::tick().await;

    common::put_file(&command, &backend, "/a/f.txt", 1).await;

    assert!(command.get_last_modified("/a").await.unwrap() > before);
}

#[tokio::test]
async fn test_get_uri() {
    let (command, backend) = common::setup_test_env().await;

    common::put_file(&command, &backend, "/a/f.txt", 1).await;

    let uri = command.get_uri("/a/f.txt").await.unwrap();
    assert_eq!(uri.kind, "memory");
    assert_eq!(uri.value, "ref:/a/f.txt");

    // Directories have no URI
    let result = command.get_uri("/a").await;
    assert!(matches!(result, Err(VfsError::InvalidPath(_))));
}

#[tokio::test]
async fn test_file_info() {
    let (command, backend) = common::setup_test_env().await;

    backend.insert("ref:img", 2048, "image/png");
    command.put("/img.png", "ref:img", ConflictMode::Default).await.unwrap();

    let info = command.file_info("/img.png").await.unwrap();
    assert_eq!(info.size, 2048);
    assert_eq!(info.mime_type, "image/png");

    let result = command.file_info("/ghost.png").await;
    assert!(matches!(result, Err(VfsError::InvalidPath(_))));
}
