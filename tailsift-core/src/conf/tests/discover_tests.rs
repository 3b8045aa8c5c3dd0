use crate::conf::{discover_log_files, is_gzip, sibling_pattern};

use std::fs;
use std::path::Path;
use tempfile::tempdir;

#[test]
fn discover_finds_live_file_and_rotated_siblings() {
    // Arrange
    let dir = tempdir().unwrap();
    let root = dir.path();

    fs::write(root.join("access.log"), "").unwrap();
    fs::write(root.join("access.log.1"), "").unwrap();
    fs::write(root.join("access.log.2.gz"), "").unwrap();
    fs::write(root.join("error.log"), "").unwrap();

    // Act
    let result = discover_log_files(&root.join("access.log")).unwrap();

    // Assert
    assert_eq!(
        result,
        vec![
            root.join("access.log"),
            root.join("access.log.1"),
            root.join("access.log.2.gz"),
        ]
    );
}

#[test]
fn discover_returns_lexicographic_order() {
    // Arrange
    let dir = tempdir().unwrap();
    let root = dir.path();

    fs::write(root.join("app.log-20240103"), "").unwrap();
    fs::write(root.join("app.log-20240101.gz"), "").unwrap();
    fs::write(root.join("app.log-20240102"), "").unwrap();

    // Act
    let result = discover_log_files(&root.join("app.log")).unwrap();

    // Assert
    assert_eq!(
        result,
        vec![
            root.join("app.log-20240101.gz"),
            root.join("app.log-20240102"),
            root.join("app.log-20240103"),
        ]
    );
}

#[test]
fn discover_skips_directories() {
    // Arrange
    let dir = tempdir().unwrap();
    let root = dir.path();

    fs::create_dir(root.join("access.log.d")).unwrap();
    fs::write(root.join("access.log"), "").unwrap();

    // Act
    let result = discover_log_files(&root.join("access.log")).unwrap();

    // Assert
    assert_eq!(result, vec![root.join("access.log")]);
}

#[test]
fn discover_returns_empty_when_nothing_matches() {
    // Arrange
    let dir = tempdir().unwrap();

    // Act
    let result = discover_log_files(&dir.path().join("missing.log")).unwrap();

    // Assert
    assert!(result.is_empty());
}

#[test]
fn sibling_pattern_escapes_metacharacters() {
    let pattern = sibling_pattern(Path::new("/logs/[edge]/access.log"));

    assert_eq!(pattern, "/logs/[[]edge[]]/access.log*");
}

#[test]
fn gzip_detection_uses_extension() {
    assert!(is_gzip(Path::new("access.log.1.gz")));
    assert!(is_gzip(Path::new("access.log.1.GZ")));
    assert!(!is_gzip(Path::new("access.log.1")));
    assert!(!is_gzip(Path::new("access.gzlog")));
}
