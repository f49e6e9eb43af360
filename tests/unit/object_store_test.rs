//! Unit tests for the sealed object store: absent and corrupt values,
//! settings fallback and propagation of store failures.

use std::sync::atomic::{AtomicBool, Ordering};

use tempfile::TempDir;

use linksafe::config::KeySource;
use linksafe::database::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore};
use linksafe::managers::object_store::{
    ObjectStore, FOLDERS_KEY, KEY_CHECK_KEY, KEY_SALT_KEY, LINKS_KEY, SETTINGS_KEY,
};
use linksafe::services::crypto_service::{CryptoService, StorageKey};
use linksafe::types::errors::{CryptoError, LibraryError, StorageError};
use linksafe::types::folder::Folder;
use linksafe::types::link::Link;
use linksafe::types::settings::{AppSettings, SortBy, SortOrder, Theme};

/// A store whose reads or writes can be switched to fail.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryKeyValueStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl KeyValueStore for FlakyStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::ReadFailed("injected".to_string()));
        }
        self.inner.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::WriteFailed("injected".to_string()));
        }
        self.inner.set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::WriteFailed("injected".to_string()));
        }
        self.inner.remove_item(key)
    }
}

#[test]
fn test_corrupt_collection_reads_as_empty() {
    let store = ObjectStore::new(MemoryKeyValueStore::new());
    store.store().set_item(FOLDERS_KEY, "not-a-ciphertext").unwrap();

    assert!(store.load_folders().unwrap().is_empty());
    // The corrupt value stays until the next save.
    assert_eq!(
        store.store().get_item(FOLDERS_KEY).unwrap().as_deref(),
        Some("not-a-ciphertext")
    );
}

#[test]
fn test_collection_sealed_under_other_key_reads_as_empty() {
    let other = CryptoService::with_key(StorageKey::from_bytes(&[9u8; 32]).unwrap());
    let sealed = other.encrypt_object(&vec![Link::new("l1", "https://a.com")]).unwrap();

    let store = ObjectStore::new(MemoryKeyValueStore::new());
    store.store().set_item(LINKS_KEY, &sealed).unwrap();
    assert!(store.load_links().unwrap().is_empty());
}

#[test]
fn test_read_failure_propagates() {
    let flaky = FlakyStore::default();
    flaky.fail_reads.store(true, Ordering::SeqCst);
    let store = ObjectStore::new(flaky);

    assert!(matches!(store.load_links(), Err(StorageError::ReadFailed(_))));
}

#[test]
fn test_write_failure_propagates_and_keeps_previous_value() {
    let store = ObjectStore::new(FlakyStore::default());
    store.save_folders(&[Folder::new("f1", "Work")]).unwrap();

    store.store().fail_writes.store(true, Ordering::SeqCst);
    let err = store
        .save_folders(&[Folder::new("f1", "Work"), Folder::new("f2", "Home")])
        .unwrap_err();
    assert!(matches!(err, LibraryError::Storage(StorageError::WriteFailed(_))));
    assert!(err.is_retryable());

    store.store().fail_writes.store(false, Ordering::SeqCst);
    assert_eq!(store.load_folders().unwrap().len(), 1);
}

#[test]
fn test_settings_default_when_absent_or_corrupt() {
    let store = ObjectStore::new(MemoryKeyValueStore::new());
    assert_eq!(store.load_settings().unwrap(), AppSettings::default());

    store.store().set_item(SETTINGS_KEY, "{broken").unwrap();
    assert_eq!(store.load_settings().unwrap(), AppSettings::default());
}

#[test]
fn test_settings_roundtrip_as_plain_json() {
    let store = ObjectStore::new(MemoryKeyValueStore::new());
    let settings = AppSettings {
        theme: Theme::Light,
        sort_by: SortBy::Name,
        sort_order: SortOrder::Asc,
    };
    store.save_settings(&settings).unwrap();

    let raw = store.store().get_item(SETTINGS_KEY).unwrap().unwrap();
    assert!(raw.contains("\"light\""));
    assert_eq!(store.load_settings().unwrap(), settings);
}

#[test]
fn test_clear_all_keeps_key_salt() {
    let source = KeySource::Passphrase("correct horse".to_string());
    let store = ObjectStore::open(MemoryKeyValueStore::new(), &source).unwrap();
    store.save_folders(&[Folder::new("f1", "Work")]).unwrap();
    store.save_settings(&AppSettings::default()).unwrap();

    store.clear_all().unwrap();

    assert!(store.load_folders().unwrap().is_empty());
    assert_eq!(store.store().get_item(SETTINGS_KEY).unwrap(), None);
    assert!(store.store().get_item(KEY_SALT_KEY).unwrap().is_some());
}

fn passphrase(p: &str) -> KeySource {
    KeySource::Passphrase(p.to_string())
}

fn is_invalid_key<S: KeyValueStore>(result: Result<ObjectStore<S>, LibraryError>) -> bool {
    matches!(result, Err(LibraryError::Crypto(CryptoError::InvalidKey(_))))
}

#[test]
fn test_wrong_passphrase_is_refused_and_data_survives() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("linksafe.db");

    {
        let kv = SqliteKeyValueStore::open(&path).unwrap();
        let store = ObjectStore::open(kv, &passphrase("right")).unwrap();
        let links: Vec<Link> = (0..3)
            .map(|i| Link::new(&format!("l{}", i), &format!("https://{}.com", i)))
            .collect();
        store.save_links(&links).unwrap();
    }

    let sealed_before = SqliteKeyValueStore::open(&path)
        .unwrap()
        .get_item(LINKS_KEY)
        .unwrap();

    let kv = SqliteKeyValueStore::open(&path).unwrap();
    assert!(is_invalid_key(ObjectStore::open(kv, &passphrase("wrnog"))));

    let kv = SqliteKeyValueStore::open(&path).unwrap();
    assert_eq!(kv.get_item(LINKS_KEY).unwrap(), sealed_before);
    let store = ObjectStore::open(kv, &passphrase("right")).unwrap();
    assert_eq!(store.load_links().unwrap().len(), 3);
}

#[test]
fn test_passphrase_store_refused_under_embedded_key() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("linksafe.db");
    {
        let kv = SqliteKeyValueStore::open(&path).unwrap();
        let store = ObjectStore::open(kv, &passphrase("right")).unwrap();
        store.save_folders(&[Folder::new("f1", "Work")]).unwrap();
    }

    let kv = SqliteKeyValueStore::open(&path).unwrap();
    assert!(is_invalid_key(ObjectStore::open(kv, &KeySource::Embedded)));
}

#[test]
fn test_passphrase_refused_over_embedded_collections() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("linksafe.db");
    {
        let store = ObjectStore::new(SqliteKeyValueStore::open(&path).unwrap());
        store.save_links(&[Link::new("l1", "https://a.com")]).unwrap();
    }

    let kv = SqliteKeyValueStore::open(&path).unwrap();
    assert!(is_invalid_key(ObjectStore::open(kv, &passphrase("late"))));

    // Nothing was written by the refused open.
    let kv = SqliteKeyValueStore::open(&path).unwrap();
    assert_eq!(kv.get_item(KEY_SALT_KEY).unwrap(), None);
    assert_eq!(kv.get_item(KEY_CHECK_KEY).unwrap(), None);
    assert_eq!(ObjectStore::new(kv).load_links().unwrap().len(), 1);
}

#[test]
fn test_key_check_survives_clear_all() {
    let source = passphrase("correct horse");
    let store = ObjectStore::open(MemoryKeyValueStore::new(), &source).unwrap();
    store.clear_all().unwrap();
    assert!(store.store().get_item(KEY_CHECK_KEY).unwrap().is_some());
}
