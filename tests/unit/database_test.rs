//! Unit tests for the SQLite layer: schema migrations and the key-value
//! store the sealed collections are written into.

use linksafe::database::migrations::{get_schema_version, CURRENT_SCHEMA_VERSION};
use linksafe::database::{Database, KeyValueStore, SqliteKeyValueStore};
use tempfile::TempDir;

#[test]
fn test_open_in_memory_applies_migrations() {
    let db = Database::open_in_memory().expect("open in-memory database");
    assert_eq!(get_schema_version(db.connection()), CURRENT_SCHEMA_VERSION);

    let count: i64 = db
        .connection()
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'kv_store'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(count, 1, "kv_store table must exist after open");
}

#[test]
fn test_reopen_does_not_rerun_migrations() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("linksafe.db");

    drop(Database::open(&path).unwrap());
    let db = Database::open(&path).unwrap();

    let rows: i64 = db
        .connection()
        .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn test_values_survive_reopen() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("linksafe.db");

    {
        let store = SqliteKeyValueStore::open(&path).unwrap();
        store.set_item("@linksafe_links", "sealed-text").unwrap();
    }

    let store = SqliteKeyValueStore::open(&path).unwrap();
    assert_eq!(
        store.get_item("@linksafe_links").unwrap().as_deref(),
        Some("sealed-text")
    );
}

#[test]
fn test_set_item_overwrites_whole_value() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("linksafe.db");
    let store = SqliteKeyValueStore::open(&path).unwrap();
    store.set_item("k", "a much longer first value").unwrap();
    store.set_item("k", "short").unwrap();
    assert_eq!(store.get_item("k").unwrap().as_deref(), Some("short"));
    drop(store);

    let rows: i64 = Database::open(&path)
        .unwrap()
        .connection()
        .query_row("SELECT COUNT(*) FROM kv_store", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn test_remove_missing_key_is_ok() {
    let store = SqliteKeyValueStore::open_in_memory().unwrap();
    store.remove_item("never-written").unwrap();
    assert_eq!(store.get_item("never-written").unwrap(), None);
}

#[test]
fn test_open_in_missing_directory_fails_with_storage_error() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("no").join("such").join("dir").join("linksafe.db");
    let result = SqliteKeyValueStore::open(&path);
    assert!(result.is_err(), "opening under a missing directory must fail");
}
