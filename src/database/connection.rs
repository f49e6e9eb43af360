// LinkSafe SQLite handle
// One connection per store; the schema is brought up to date before the handle is returned.

use std::path::Path;
use std::time::Duration;

use log::{debug, error};
use rusqlite::Connection;

use super::migrations;
use crate::types::errors::StorageError;

/// How long a write waits on a lock held by another process.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// An open, migrated SQLite database.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens or creates the database file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| {
            error!("event=db_open module=database status=error error={}", e);
            StorageError::Unavailable(format!("Failed to open {}: {}", path.display(), e))
        })?;
        Self::prepare(conn)
    }

    /// A private in-memory database, gone when the handle drops.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        Self::prepare(conn)
    }

    fn prepare(conn: Connection) -> Result<Self, StorageError> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        migrations::run_all(&conn)?;
        debug!(
            "event=db_open module=database status=ok schema_version={}",
            migrations::get_schema_version(&conn)
        );
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
