//! Durable object store for LinkSafe.
//!
//! Maps the folder and link collections onto single keys of a
//! [`KeyValueStore`], each sealed as one encrypted JSON array, plus an
//! unencrypted settings record. Every save rewrites the whole collection.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use log::{debug, error, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use zeroize::Zeroize;

use crate::config::KeySource;
use crate::database::kv_store::KeyValueStore;
use crate::services::crypto_service::{CryptoService, CryptoServiceTrait, StorageKey};
use crate::types::errors::{CryptoError, LibraryError, StorageError};
use crate::types::folder::Folder;
use crate::types::link::Link;
use crate::types::settings::AppSettings;

pub const FOLDERS_KEY: &str = "@linksafe_folders";
pub const LINKS_KEY: &str = "@linksafe_links";
pub const SETTINGS_KEY: &str = "@linksafe_settings";
/// PBKDF2 salt for passphrase-derived keys, stored in the clear.
pub const KEY_SALT_KEY: &str = "@linksafe_key_salt";
/// Known value sealed under a passphrase-derived key.
pub const KEY_CHECK_KEY: &str = "@linksafe_key_check";
const KEY_CHECK_PLAINTEXT: &str = "linksafe-key-check-v1";

/// Whole-collection persistence over a key-value store.
pub struct ObjectStore<S: KeyValueStore> {
    store: S,
    crypto: CryptoService,
}

impl<S: KeyValueStore> ObjectStore<S> {
    /// Creates an object store sealing under the embedded application key.
    pub fn new(store: S) -> Self {
        Self::with_crypto(store, CryptoService::new())
    }

    pub fn with_crypto(store: S, crypto: CryptoService) -> Self {
        Self { store, crypto }
    }

    /// Creates an object store whose key comes from `source`.
    ///
    /// A passphrase store carries a key check sealed under the derived key.
    /// Opening fails with `CryptoError::InvalidKey` when the check does not
    /// open under the given key, when a passphrase store is opened with the
    /// embedded key, or when sealed collections exist without a check. The
    /// salt and check are written on first use.
    pub fn open(store: S, source: &KeySource) -> Result<Self, LibraryError> {
        let check = store.get_item(KEY_CHECK_KEY)?;
        let crypto = match source {
            KeySource::Embedded => {
                if check.is_some() {
                    return Err(Self::refuse("store is sealed under a passphrase"));
                }
                CryptoService::new()
            }
            KeySource::Passphrase(passphrase) => {
                if check.is_none() && Self::has_sealed_collections(&store)? {
                    return Err(Self::refuse(
                        "existing collections were not sealed under a passphrase",
                    ));
                }
                let crypto = CryptoService::with_key(Self::derive_storage_key(&store, passphrase)?);
                match check {
                    Some(sealed) => Self::verify_key_check(&crypto, &sealed)?,
                    None => {
                        store.set_item(KEY_CHECK_KEY, &crypto.encrypt(KEY_CHECK_PLAINTEXT)?)?;
                        info!("event=key_check_created module=object_store status=ok");
                    }
                }
                crypto
            }
        };
        Ok(Self::with_crypto(store, crypto))
    }

    fn derive_storage_key(store: &S, passphrase: &str) -> Result<StorageKey, LibraryError> {
        let bootstrap = CryptoService::new();
        let salt = Self::load_or_create_salt(store, &bootstrap)?;
        let mut derived = bootstrap.derive_key(passphrase, &salt)?;
        let key = StorageKey::from_bytes(&derived);
        derived.zeroize();
        Ok(key?)
    }

    fn load_or_create_salt(store: &S, crypto: &CryptoService) -> Result<Vec<u8>, LibraryError> {
        if let Some(encoded) = store.get_item(KEY_SALT_KEY)? {
            return BASE64.decode(encoded.trim()).map_err(|e| {
                LibraryError::Crypto(CryptoError::KeyDerivation(format!(
                    "Stored salt is not valid base64: {}",
                    e
                )))
            });
        }

        let salt = crypto.generate_salt()?;
        store.set_item(KEY_SALT_KEY, &BASE64.encode(&salt))?;
        info!("event=key_salt_created module=object_store status=ok");
        Ok(salt)
    }

    fn has_sealed_collections(store: &S) -> Result<bool, StorageError> {
        for key in [FOLDERS_KEY, LINKS_KEY] {
            if store.get_item(key)?.is_some() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn verify_key_check(crypto: &CryptoService, sealed: &str) -> Result<(), LibraryError> {
        match crypto.decrypt(sealed) {
            Ok(plain) if plain == KEY_CHECK_PLAINTEXT => Ok(()),
            _ => Err(Self::refuse("passphrase does not open this store")),
        }
    }

    fn refuse(reason: &str) -> LibraryError {
        warn!("event=store_open module=object_store status=denied reason={:?}", reason);
        LibraryError::Crypto(CryptoError::InvalidKey(reason.to_string()))
    }

    /// The crypto service collections are sealed with.
    pub fn crypto(&self) -> &CryptoService {
        &self.crypto
    }

    /// The underlying key-value store.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn load_folders(&self) -> Result<Vec<Folder>, StorageError> {
        self.load_collection(FOLDERS_KEY, "folders")
    }

    pub fn load_links(&self) -> Result<Vec<Link>, StorageError> {
        self.load_collection(LINKS_KEY, "links")
    }

    pub fn save_folders(&self, folders: &[Folder]) -> Result<(), LibraryError> {
        self.save_collection(FOLDERS_KEY, "folders", folders)
    }

    pub fn save_links(&self, links: &[Link]) -> Result<(), LibraryError> {
        self.save_collection(LINKS_KEY, "links", links)
    }

    /// Reads a sealed collection.
    ///
    /// An absent key is an empty collection. A value that fails to decrypt
    /// or parse is logged and also read as empty; the corrupt value stays
    /// in place until the next save overwrites it.
    fn load_collection<T: DeserializeOwned>(
        &self,
        key: &str,
        label: &str,
    ) -> Result<Vec<T>, StorageError> {
        let sealed = match self.store.get_item(key)? {
            Some(value) => value,
            None => {
                debug!("event=collection_load module=object_store collection={} status=empty", label);
                return Ok(Vec::new());
            }
        };

        match self.crypto.decrypt_object::<Vec<T>>(&sealed) {
            Ok(items) => {
                debug!(
                    "event=collection_load module=object_store collection={} status=ok count={}",
                    label,
                    items.len()
                );
                Ok(items)
            }
            Err(err) => {
                warn!(
                    "event=collection_load module=object_store collection={} status=degraded error={}",
                    label, err
                );
                Ok(Vec::new())
            }
        }
    }

    fn save_collection<T: Serialize>(
        &self,
        key: &str,
        label: &str,
        items: &[T],
    ) -> Result<(), LibraryError> {
        let sealed = self.crypto.encrypt_object(items).map_err(|err| {
            error!(
                "event=collection_save module=object_store collection={} status=error error={}",
                label, err
            );
            err
        })?;

        self.store.set_item(key, &sealed).map_err(|err| {
            error!(
                "event=collection_save module=object_store collection={} status=error error={}",
                label, err
            );
            err
        })?;

        debug!(
            "event=collection_save module=object_store collection={} status=ok count={}",
            label,
            items.len()
        );
        Ok(())
    }

    /// Reads the settings record, falling back to defaults when it is
    /// absent or unreadable.
    pub fn load_settings(&self) -> Result<AppSettings, StorageError> {
        let raw = match self.store.get_item(SETTINGS_KEY)? {
            Some(raw) => raw,
            None => return Ok(AppSettings::default()),
        };

        match serde_json::from_str(&raw) {
            Ok(settings) => Ok(settings),
            Err(err) => {
                warn!(
                    "event=settings_load module=object_store status=degraded error={}",
                    err
                );
                Ok(AppSettings::default())
            }
        }
    }

    /// Writes the settings record as plain JSON.
    pub fn save_settings(&self, settings: &AppSettings) -> Result<(), StorageError> {
        let json = serde_json::to_string(settings)
            .map_err(|e| StorageError::WriteFailed(format!("Failed to serialize settings: {}", e)))?;
        self.store.set_item(SETTINGS_KEY, &json)
    }

    /// Erases the folder, link and settings records. The key salt and key
    /// check stay so data written afterwards opens under the same passphrase.
    pub fn clear_all(&self) -> Result<(), StorageError> {
        for key in [FOLDERS_KEY, LINKS_KEY, SETTINGS_KEY] {
            self.store.remove_item(key).map_err(|err| {
                error!("event=clear_all module=object_store status=error error={}", err);
                err
            })?;
        }
        info!("event=clear_all module=object_store status=ok");
        Ok(())
    }
}
