use crate::static_files::{ResolveError, resolve_static_path};
use std::fs;
use tempfile::TempDir;

fn site() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("index.html"), "<html>root</html>").unwrap();
    fs::create_dir(dir.path().join("assets")).unwrap();
    fs::write(dir.path().join("assets/app.js"), "console.log(1)").unwrap();
    fs::create_dir(dir.path().join("docs")).unwrap();
    fs::write(dir.path().join("docs/index.html"), "<html>docs</html>").unwrap();
    dir
}

#[test]
fn resolves_regular_file() {
    // Arrange
    let dir = site();

    // Act
    let path = resolve_static_path(dir.path(), "/assets/app.js", false).unwrap();

    // Assert
    assert!(path.ends_with("assets/app.js"));
}

#[test]
fn root_and_directories_serve_index() {
    // Arrange
    let dir = site();

    // Act
    let root = resolve_static_path(dir.path(), "/", false).unwrap();
    let docs = resolve_static_path(dir.path(), "/docs/", false).unwrap();

    // Assert
    assert!(root.ends_with("index.html"));
    assert!(docs.ends_with("docs/index.html"));
}

#[test]
fn percent_encoded_names_are_decoded_once() {
    // Arrange
    let dir = site();
    fs::write(dir.path().join("assets/my file.css"), "body{}").unwrap();

    // Act
    let path = resolve_static_path(dir.path(), "/assets/my%20file.css", false).unwrap();

    // Assert
    assert!(path.ends_with("assets/my file.css"));
}

#[test]
fn traversal_is_forbidden() {
    // Arrange
    let dir = site();

    // Act
    let err = resolve_static_path(dir.path(), "/../etc/passwd", true).unwrap_err();
    let encoded = resolve_static_path(dir.path(), "/%2e%2e/etc/passwd", true).unwrap_err();

    // Assert
    assert_eq!(err, ResolveError::Forbidden);
    assert_eq!(encoded, ResolveError::Forbidden);
}

#[test]
fn spa_fallback_serves_root_index_for_routes() {
    // Arrange
    let dir = site();

    // Act
    let path = resolve_static_path(dir.path(), "/vehicle/autopilot", true).unwrap();

    // Assert
    assert_eq!(path, dir.path().join("index.html"));
}

#[test]
fn spa_fallback_skips_missing_assets() {
    // Arrange
    let dir = site();

    // Act
    let err = resolve_static_path(dir.path(), "/assets/missing.js", true).unwrap_err();

    // Assert
    assert_eq!(err, ResolveError::NotFound);
}

#[test]
fn unknown_route_without_fallback_is_not_found() {
    // Arrange
    let dir = site();

    // Act
    let err = resolve_static_path(dir.path(), "/vehicle/autopilot", false).unwrap_err();

    // Assert
    assert_eq!(err, ResolveError::NotFound);
}

#[test]
fn relative_request_path_is_rejected() {
    // Arrange
    let dir = site();

    // Act
    let err = resolve_static_path(dir.path(), "assets/app.js", false).unwrap_err();

    // Assert
    assert_eq!(err, ResolveError::BadPath);
}
