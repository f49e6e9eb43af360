// LinkSafe runtime configuration
// Resolved from environment variables, falling back to platform defaults.

use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::logging;
use crate::platform;

pub const DATA_DIR_ENV: &str = "LINKSAFE_DATA_DIR";
pub const LOG_LEVEL_ENV: &str = "LINKSAFE_LOG_LEVEL";
pub const PASSPHRASE_ENV: &str = "LINKSAFE_PASSPHRASE";

/// File name of the SQLite store inside the data directory.
pub const DB_FILE_NAME: &str = "linksafe.db";

/// Where the storage key comes from.
#[derive(Clone, PartialEq, Eq)]
pub enum KeySource {
    /// Fixed key compiled into the application.
    Embedded,
    /// Key derived from a user passphrase and a per-install salt.
    Passphrase(String),
}

impl fmt::Debug for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySource::Embedded => f.write_str("Embedded"),
            KeySource::Passphrase(_) => f.write_str("Passphrase(..)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub log_level: String,
    pub key_source: KeySource,
}

impl AppConfig {
    /// Reads `LINKSAFE_DATA_DIR`, `LINKSAFE_LOG_LEVEL` and `LINKSAFE_PASSPHRASE`.
    pub fn from_env() -> Self {
        let data_dir = env::var(DATA_DIR_ENV)
            .ok()
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(platform::data_dir);

        let log_level = env::var(LOG_LEVEL_ENV)
            .ok()
            .filter(|level| !level.trim().is_empty())
            .unwrap_or_else(|| logging::default_log_level().to_string());

        let key_source = match env::var(PASSPHRASE_ENV) {
            Ok(passphrase) if !passphrase.is_empty() => KeySource::Passphrase(passphrase),
            _ => KeySource::Embedded,
        };

        Self {
            data_dir,
            log_level,
            key_source,
        }
    }

    /// Configuration rooted at an explicit directory with the embedded key.
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            log_level: logging::default_log_level().to_string(),
            key_source: KeySource::Embedded,
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}
