//! Integration tests for config loading and merging
//!
//! Loads `.gotag.toml` files from disk, merges them with command-line
//! requests, and drives a rewrite with the result.

use gotag::config::{self, load_from_path, load_from_str, CliRequests, ConfigError};
use gotag::{rewrite_source, AddRequest, InsertionIndex, NamingStyle, RemoveRequest};
use std::fs;
use tempfile::TempDir;

const FULL: &str = r#"
index = -1
remove = ["gorm", "gorm"]

[[add]]
key = "json"
style = "aA"

[[add]]
key = "msgpack"
style = "pascal"

[[add]]
key = "db"
style = "snake"
"#;

#[test]
fn test_load_and_merge_from_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(".gotag.toml");
    fs::write(&path, FULL).unwrap();

    let file = load_from_path(&path).unwrap();
    let cli = CliRequests {
        add: vec!["db:upper".to_string()],
        remove: vec!["xml".to_string()],
        index: None,
    };
    let tag_config = config::build(Some(&file), &cli).unwrap();

    assert_eq!(
        tag_config.adds,
        vec![
            AddRequest::new("json", NamingStyle::Camel),
            AddRequest::new("db", NamingStyle::Upper),
        ]
    );
    assert_eq!(
        tag_config.removes,
        vec![RemoveRequest::new("gorm"), RemoveRequest::new("xml")]
    );
    assert_eq!(tag_config.index, InsertionIndex::ReplaceAll);
}

#[test]
fn test_merged_config_drives_rewrite() {
    let file = load_from_str(FULL).unwrap();
    let tag_config = config::build(Some(&file), &CliRequests::default()).unwrap();

    let source = "package m\n\ntype T struct {\n\tUserID int `gorm:\"primaryKey\" xml:\"u\"`\n}\n";
    let rewrite = rewrite_source(source, &tag_config).unwrap();

    assert_eq!(
        rewrite.output,
        "package m\n\ntype T struct {\n\tUserID int `json:\"userID\" db:\"user_id\"`\n}\n"
    );
}

#[test]
fn test_discover_prefers_explicit_path() {
    let dir = TempDir::new().unwrap();
    let local = dir.path().join(".gotag.toml");
    fs::write(&local, "").unwrap();
    let explicit = dir.path().join("other.toml");

    assert_eq!(
        config::discover(Some(&explicit), dir.path()),
        Some(explicit.clone())
    );
    if std::env::var_os("GOTAG_CONFIG").is_none() {
        assert_eq!(config::discover(None, dir.path()), Some(local));
    }
}

#[test]
fn test_error_categories() {
    let dir = TempDir::new().unwrap();

    let missing = load_from_path(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(missing, ConfigError::Io { .. }));
    assert_eq!(missing.exit_code(), 4);

    let path = dir.path().join("bad.toml");
    fs::write(&path, "index = \"first\"\n").unwrap();
    let bad_type = load_from_path(&path).unwrap_err();
    assert!(matches!(bad_type, ConfigError::Toml { path: Some(_), .. }));
    assert_eq!(bad_type.exit_code(), 4);

    let cli = CliRequests {
        add: vec!["json:camel:extra".to_string()],
        ..CliRequests::default()
    };
    assert_eq!(config::build(None, &cli).unwrap_err().exit_code(), 3);
}
