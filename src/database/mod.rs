//! LinkSafe database layer.
//!
//! Provides SQLite connection management, schema migrations and the
//! key-value stores the object store writes sealed collections into.
//!
//! # Usage
//!
//! ```no_run
//! use linksafe::database::{KeyValueStore, SqliteKeyValueStore};
//!
//! let store = SqliteKeyValueStore::open("linksafe.db").expect("failed to open store");
//! store.set_item("greeting", "hello").expect("write failed");
//! ```

pub mod connection;
pub mod kv_store;
pub mod migrations;

pub use connection::Database;
pub use kv_store::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore};
