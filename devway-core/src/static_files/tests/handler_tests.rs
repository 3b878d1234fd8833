use crate::conf::StaticFilesConfig;
use crate::static_files::{StaticBody, handle_static_request};
use http::{Method, StatusCode, header};
use std::fs;

fn config(dir: &tempfile::TempDir) -> StaticFilesConfig {
    StaticFilesConfig {
        dir: dir.path().to_path_buf(),
        spa_fallback: true,
    }
}

#[tokio::test]
async fn no_static_dir_means_not_found() {
    // Act
    let resp = handle_static_request(None, Some(&Method::GET), "/unknown/path").await;

    // Assert
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert!(matches!(resp.body, StaticBody::Empty));
}

#[tokio::test]
async fn serves_file_with_content_type_and_length() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("app.js"), "console.log(1)").unwrap();
    let cfg = config(&dir);

    // Act
    let resp = handle_static_request(Some(&cfg), Some(&Method::GET), "/app.js").await;

    // Assert
    assert_eq!(resp.status, StatusCode::OK);
    let content_type = resp.headers.get(header::CONTENT_TYPE).unwrap();
    assert!(content_type.to_str().unwrap().contains("javascript"));
    assert_eq!(resp.headers.get(header::CONTENT_LENGTH).unwrap(), "14");
    assert!(matches!(resp.body, StaticBody::File { len: 14, .. }));
}

#[tokio::test]
async fn rejects_non_read_methods() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(&dir);

    // Act
    let resp = handle_static_request(Some(&cfg), Some(&Method::POST), "/index.html").await;

    // Assert
    assert_eq!(resp.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(resp.headers.get(header::ALLOW).unwrap(), "GET, HEAD");
}

#[tokio::test]
async fn traversal_maps_to_forbidden() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(&dir);

    // Act
    let resp = handle_static_request(Some(&cfg), Some(&Method::GET), "/../secret").await;

    // Assert
    assert_eq!(resp.status, StatusCode::FORBIDDEN);
}
