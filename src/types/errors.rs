// LinkSafe error types
// Storage, validation and crypto failures, and the library error that wraps them.

use std::fmt;

// === StorageError ===

/// Errors raised by the underlying key-value store.
#[derive(Debug)]
pub enum StorageError {
    /// The store could not be opened or is not reachable.
    Unavailable(String),
    /// Reading a key failed.
    ReadFailed(String),
    /// Writing or removing a key failed.
    WriteFailed(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Unavailable(msg) => write!(f, "Storage unavailable: {}", msg),
            StorageError::ReadFailed(msg) => write!(f, "Storage read failed: {}", msg),
            StorageError::WriteFailed(msg) => write!(f, "Storage write failed: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::Unavailable(err.to_string())
    }
}

// === ValidationError ===

/// Input rejected before any store interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Folder name is empty after trimming.
    EmptyName,
    /// Link URL is empty after trimming.
    EmptyUrl,
    /// Link URL does not parse as an absolute URL with a host.
    InvalidUrl(String),
    /// A private item was given no password.
    PasswordRequired,
    /// The password is shorter than the policy minimum.
    PasswordTooShort { min: usize },
    /// Password and confirmation differ.
    PasswordMismatch,
    /// A private item carries no password hash.
    MissingPasswordHash(String),
    /// A non-private item carries a password hash.
    UnexpectedPasswordHash(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyName => write!(f, "Folder name is required"),
            ValidationError::EmptyUrl => write!(f, "URL is required"),
            ValidationError::InvalidUrl(url) => write!(f, "Invalid URL format: {}", url),
            ValidationError::PasswordRequired => {
                write!(f, "Password is required for private items")
            }
            ValidationError::PasswordTooShort { min } => {
                write!(f, "Password must be at least {} characters", min)
            }
            ValidationError::PasswordMismatch => write!(f, "Passwords do not match"),
            ValidationError::MissingPasswordHash(id) => {
                write!(f, "Private item has no password hash: {}", id)
            }
            ValidationError::UnexpectedPasswordHash(id) => {
                write!(f, "Public item carries a password hash: {}", id)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

// === LibraryError ===

/// Errors returned by folder and link operations.
#[derive(Debug)]
pub enum LibraryError {
    /// The input was rejected; nothing was written.
    Validation(ValidationError),
    /// The key-value store failed; the operation may be retried.
    Storage(StorageError),
    /// Sealing or opening a collection failed.
    Crypto(CryptoError),
}

impl LibraryError {
    /// Only store failures are worth retrying. Validation and crypto
    /// failures will fail the same way again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LibraryError::Storage(_))
    }

    /// Short machine-readable kind used on the RPC surface.
    pub fn kind(&self) -> &'static str {
        match self {
            LibraryError::Validation(_) => "validation",
            LibraryError::Storage(_) => "storage",
            LibraryError::Crypto(_) => "crypto",
        }
    }
}

impl fmt::Display for LibraryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LibraryError::Validation(err) => write!(f, "{}", err),
            LibraryError::Storage(err) => write!(f, "{}", err),
            LibraryError::Crypto(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for LibraryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LibraryError::Validation(err) => Some(err),
            LibraryError::Storage(err) => Some(err),
            LibraryError::Crypto(err) => Some(err),
        }
    }
}

impl From<ValidationError> for LibraryError {
    fn from(err: ValidationError) -> Self {
        LibraryError::Validation(err)
    }
}

impl From<StorageError> for LibraryError {
    fn from(err: StorageError) -> Self {
        LibraryError::Storage(err)
    }
}

impl From<CryptoError> for LibraryError {
    fn from(err: CryptoError) -> Self {
        LibraryError::Crypto(err)
    }
}

// === CryptoError ===

/// Failures sealing or opening stored data.
#[derive(Debug)]
pub enum CryptoError {
    /// Failed to derive encryption key from password.
    KeyDerivation(String),
    /// Encryption operation failed.
    Encryption(String),
    /// Decryption operation failed.
    Decryption(String),
    /// Failed to generate random bytes.
    RandomGeneration(String),
    /// The provided key is invalid.
    InvalidKey(String),
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CryptoError::KeyDerivation(msg) => write!(f, "Key derivation failed: {}", msg),
            CryptoError::Encryption(msg) => write!(f, "Encryption failed: {}", msg),
            CryptoError::Decryption(msg) => write!(f, "Decryption failed: {}", msg),
            CryptoError::RandomGeneration(msg) => {
                write!(f, "Random generation failed: {}", msg)
            }
            CryptoError::InvalidKey(msg) => write!(f, "Invalid key: {}", msg),
        }
    }
}

impl std::error::Error for CryptoError {}
