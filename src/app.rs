//! App Core for LinkSafe.
//!
//! Owns the library repository and the session unlock set, and keeps the
//! two consistent: deleting an item or clearing the library also drops
//! its unlock state.

use log::info;

use crate::config::AppConfig;
use crate::database::kv_store::SqliteKeyValueStore;
use crate::managers::library_manager::{FolderRemoval, LibraryManager, LibraryManagerTrait};
use crate::managers::object_store::ObjectStore;
use crate::managers::unlock_manager::{UnlockManagerTrait, UnlockTracker};
use crate::types::errors::{LibraryError, StorageError};

/// Central application struct.
pub struct App {
    pub library: LibraryManager<SqliteKeyValueStore>,
    pub unlocks: UnlockTracker,
}

impl App {
    /// Opens the store under `config.data_dir`, creating the directory if
    /// needed.
    pub fn open(config: &AppConfig) -> Result<Self, LibraryError> {
        std::fs::create_dir_all(&config.data_dir).map_err(|e| {
            StorageError::Unavailable(format!(
                "Failed to create data directory {}: {}",
                config.data_dir.display(),
                e
            ))
        })?;

        let kv = SqliteKeyValueStore::open(config.db_path())?;
        let store = ObjectStore::open(kv, &config.key_source)?;
        info!(
            "event=app_open module=core status=ok key_source={:?}",
            config.key_source
        );
        Ok(Self::with_store(store))
    }

    /// An app over a throwaway in-memory SQLite store.
    pub fn in_memory() -> Result<Self, LibraryError> {
        let kv = SqliteKeyValueStore::open_in_memory()?;
        Ok(Self::with_store(ObjectStore::new(kv)))
    }

    pub fn with_store(store: ObjectStore<SqliteKeyValueStore>) -> Self {
        Self {
            library: LibraryManager::new(store),
            unlocks: UnlockTracker::new(),
        }
    }

    /// Deletes a folder with its links and forgets their unlock state.
    pub fn delete_folder(&mut self, folder_id: &str) -> Result<FolderRemoval, LibraryError> {
        let removal = self.library.delete_folder(folder_id)?;
        self.unlocks.forget(
            std::iter::once(folder_id).chain(removal.removed_link_ids.iter().map(String::as_str)),
        );
        Ok(removal)
    }

    pub fn delete_link(&mut self, link_id: &str) -> Result<bool, LibraryError> {
        let removed = self.library.delete_link(link_id)?;
        self.unlocks.lock(link_id);
        Ok(removed)
    }

    /// Erases all stored data and locks everything.
    pub fn clear_all(&mut self) -> Result<(), LibraryError> {
        self.library.clear_all()?;
        self.unlocks.lock_all();
        Ok(())
    }
}
