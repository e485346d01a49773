//! Databases configured from vellum.toml

use crate::common::*;
use std::sync::Arc;
use tempfile::TempDir;
use vellum::{Database, Direction, VellumConfig, CONFIG_FILE_NAME};

#[test]
fn config_file_seeds_history_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "default_direction = \"descending\"\nhistory_with_docs = true\n").unwrap();

    let f = scenario_e1();
    let db = Database::builder(Arc::new(f.store.clone()))
        .config_from_file(&path)
        .unwrap()
        .build()
        .unwrap();
    let ds = db.open_datasource(Some(ts(2)), Some(ts(3))).unwrap();
    let opts = ds.default_history_options();
    assert_eq!(opts.direction, Direction::Descending);
    assert_eq!(names(&ds.entity_history("e", &opts).unwrap()), vec!["C", "B"]);
}

#[test]
fn missing_config_file_is_created_with_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    let db = Database::builder(Arc::new(MemoryRevisionStore::new()))
        .config_from_file(&path)
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(db.config(), &VellumConfig::default());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), VellumConfig::default_toml());
}

#[test]
fn malformed_config_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "cursor_batch_size = \"many\"\n").unwrap();
    let err = Database::builder(Arc::new(MemoryRevisionStore::new()))
        .config_from_file(&path)
        .err();
    assert!(matches!(err, Some(VellumError::Config { .. })));
}
