//! Cryptographic primitives for LinkSafe.
//!
//! Collections are sealed with AES-256-GCM under a single storage key and
//! carried as base64 text (`nonce || ciphertext || tag`). Passwords are
//! fingerprinted with SHA-256 and compared as lowercase hex.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use ring::aead::{self, Aad, BoundKey, Nonce, NonceSequence, UnboundKey, AES_256_GCM};
use ring::digest;
use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::num::NonZeroU32;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::types::envelope::EncryptedData;
use crate::types::errors::CryptoError;

/// PBKDF2 iteration count for passphrase-derived storage keys.
const PBKDF2_ITERATIONS: u32 = 100_000;

/// Salt length in bytes for PBKDF2.
pub const SALT_LENGTH: usize = 16;

/// AES-256-GCM key length in bytes.
pub const KEY_LENGTH: usize = 32;

/// AES-256-GCM nonce/IV length in bytes.
pub const NONCE_LENGTH: usize = 12;

/// AES-256-GCM authentication tag length in bytes.
pub const TAG_LENGTH: usize = 16;

/// Secret compiled into the application. Anyone holding the binary can
/// recover the embedded key; `KeySource::Passphrase` avoids it.
const EMBEDDED_KEY_MATERIAL: &[u8] = b"LinkSafe_Secure_Key_2024_v1";

/// The symmetric key every collection is sealed under. Wiped on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct StorageKey([u8; KEY_LENGTH]);

impl StorageKey {
    /// The fixed application key: SHA-256 of the embedded secret.
    pub fn embedded() -> Self {
        let hashed = digest::digest(&digest::SHA256, EMBEDDED_KEY_MATERIAL);
        let mut key = [0u8; KEY_LENGTH];
        key.copy_from_slice(hashed.as_ref());
        Self(key)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != KEY_LENGTH {
            return Err(CryptoError::InvalidKey(format!(
                "Key must be {} bytes, got {}",
                KEY_LENGTH,
                bytes.len()
            )));
        }
        let mut key = [0u8; KEY_LENGTH];
        key.copy_from_slice(bytes);
        Ok(Self(key))
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StorageKey(..)")
    }
}

fn pbkdf2_sha256(password: &str, salt: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if salt.is_empty() {
        return Err(CryptoError::KeyDerivation("Salt cannot be empty".to_string()));
    }
    let iterations = NonZeroU32::new(PBKDF2_ITERATIONS)
        .ok_or_else(|| CryptoError::KeyDerivation("Invalid iteration count".to_string()))?;

    let mut key = vec![0u8; KEY_LENGTH];
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        iterations,
        salt,
        password.as_bytes(),
        &mut key,
    );
    Ok(key)
}

/// Trait defining the cryptographic operations the store relies on.
pub trait CryptoServiceTrait {
    /// Derives a 32-byte key from a password and salt using PBKDF2.
    fn derive_key(&self, password: &str, salt: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Encrypts raw bytes using AES-256-GCM, returning ciphertext, IV, and auth tag.
    fn encrypt_aes256gcm(&self, plaintext: &[u8], key: &[u8])
        -> Result<EncryptedData, CryptoError>;

    /// Decrypts data encrypted with AES-256-GCM.
    fn decrypt_aes256gcm(&self, encrypted: &EncryptedData, key: &[u8])
        -> Result<Vec<u8>, CryptoError>;

    /// Generates a random PBKDF2 salt.
    fn generate_salt(&self) -> Result<Vec<u8>, CryptoError>;

    /// Encrypts a string under the storage key into base64 envelope text.
    fn encrypt(&self, plaintext: &str) -> Result<String, CryptoError>;

    /// Reverses `encrypt`. Fails on malformed text or a foreign key.
    fn decrypt(&self, ciphertext: &str) -> Result<String, CryptoError>;
}

/// A nonce sequence that uses a single nonce value.
/// Used for one-shot encryption/decryption operations.
struct SingleNonce {
    nonce: Option<[u8; NONCE_LENGTH]>,
}

impl SingleNonce {
    fn new(nonce_bytes: [u8; NONCE_LENGTH]) -> Self {
        Self {
            nonce: Some(nonce_bytes),
        }
    }
}

impl NonceSequence for SingleNonce {
    fn advance(&mut self) -> Result<Nonce, ring::error::Unspecified> {
        self.nonce
            .take()
            .map(Nonce::assume_unique_for_key)
            .ok_or(ring::error::Unspecified)
    }
}

/// Cryptographic service bound to one storage key, built on `ring`.
pub struct CryptoService {
    rng: SystemRandom,
    key: StorageKey,
}

impl CryptoService {
    /// Creates a service using the embedded application key.
    pub fn new() -> Self {
        Self::with_key(StorageKey::embedded())
    }

    pub fn with_key(key: StorageKey) -> Self {
        Self {
            rng: SystemRandom::new(),
            key,
        }
    }

    /// Serializes `value` to JSON and encrypts it.
    pub fn encrypt_object<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, CryptoError> {
        let json = serde_json::to_string(value)
            .map_err(|e| CryptoError::Encryption(format!("Failed to serialize: {}", e)))?;
        self.encrypt(&json)
    }

    /// Decrypts and deserializes. A bad envelope and a malformed payload
    /// both surface as `CryptoError::Decryption`.
    pub fn decrypt_object<T: DeserializeOwned>(&self, ciphertext: &str) -> Result<T, CryptoError> {
        let json = self.decrypt(ciphertext)?;
        serde_json::from_str(&json)
            .map_err(|e| CryptoError::Decryption(format!("Malformed payload: {}", e)))
    }

    fn check_key_length(key: &[u8]) -> Result<(), CryptoError> {
        if key.len() != KEY_LENGTH {
            return Err(CryptoError::InvalidKey(format!(
                "Key must be {} bytes, got {}",
                KEY_LENGTH,
                key.len()
            )));
        }
        Ok(())
    }
}

impl Default for CryptoService {
    fn default() -> Self {
        Self::new()
    }
}

impl CryptoServiceTrait for CryptoService {
    fn derive_key(&self, password: &str, salt: &[u8]) -> Result<Vec<u8>, CryptoError> {
        pbkdf2_sha256(password, salt)
    }

    fn encrypt_aes256gcm(
        &self,
        plaintext: &[u8],
        key: &[u8],
    ) -> Result<EncryptedData, CryptoError> {
        Self::check_key_length(key)?;

        let mut nonce_bytes = [0u8; NONCE_LENGTH];
        self.rng
            .fill(&mut nonce_bytes)
            .map_err(|_| CryptoError::RandomGeneration("Failed to generate nonce".to_string()))?;

        let unbound_key = UnboundKey::new(&AES_256_GCM, key)
            .map_err(|_| CryptoError::Encryption("Failed to create encryption key".to_string()))?;
        let mut sealing_key = aead::SealingKey::new(unbound_key, SingleNonce::new(nonce_bytes));

        let mut in_out = plaintext.to_vec();
        sealing_key
            .seal_in_place_append_tag(Aad::empty(), &mut in_out)
            .map_err(|_| CryptoError::Encryption("Encryption operation failed".to_string()))?;

        // ring appends the tag; keep it separate in the container.
        let tag_start = in_out.len() - TAG_LENGTH;
        let auth_tag = in_out.split_off(tag_start);

        Ok(EncryptedData {
            ciphertext: in_out,
            iv: nonce_bytes.to_vec(),
            auth_tag,
        })
    }

    fn decrypt_aes256gcm(
        &self,
        encrypted: &EncryptedData,
        key: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        Self::check_key_length(key)?;

        if encrypted.iv.len() != NONCE_LENGTH {
            return Err(CryptoError::Decryption(format!(
                "IV must be {} bytes, got {}",
                NONCE_LENGTH,
                encrypted.iv.len()
            )));
        }
        if encrypted.auth_tag.len() != TAG_LENGTH {
            return Err(CryptoError::Decryption(format!(
                "Auth tag must be {} bytes, got {}",
                TAG_LENGTH,
                encrypted.auth_tag.len()
            )));
        }

        let mut nonce_bytes = [0u8; NONCE_LENGTH];
        nonce_bytes.copy_from_slice(&encrypted.iv);

        let unbound_key = UnboundKey::new(&AES_256_GCM, key)
            .map_err(|_| CryptoError::Decryption("Failed to create decryption key".to_string()))?;
        let mut opening_key = aead::OpeningKey::new(unbound_key, SingleNonce::new(nonce_bytes));

        let mut in_out = Vec::with_capacity(encrypted.ciphertext.len() + TAG_LENGTH);
        in_out.extend_from_slice(&encrypted.ciphertext);
        in_out.extend_from_slice(&encrypted.auth_tag);

        let plaintext = opening_key
            .open_in_place(Aad::empty(), &mut in_out)
            .map_err(|_| {
                CryptoError::Decryption("invalid key or corrupted data".to_string())
            })?;

        Ok(plaintext.to_vec())
    }

    fn generate_salt(&self) -> Result<Vec<u8>, CryptoError> {
        let mut salt = vec![0u8; SALT_LENGTH];
        self.rng
            .fill(&mut salt)
            .map_err(|_| CryptoError::RandomGeneration("Failed to generate salt".to_string()))?;
        Ok(salt)
    }

    fn encrypt(&self, plaintext: &str) -> Result<String, CryptoError> {
        let sealed = self.encrypt_aes256gcm(plaintext.as_bytes(), self.key.as_bytes())?;

        let mut envelope =
            Vec::with_capacity(NONCE_LENGTH + sealed.ciphertext.len() + TAG_LENGTH);
        envelope.extend_from_slice(&sealed.iv);
        envelope.extend_from_slice(&sealed.ciphertext);
        envelope.extend_from_slice(&sealed.auth_tag);
        Ok(BASE64.encode(envelope))
    }

    fn decrypt(&self, ciphertext: &str) -> Result<String, CryptoError> {
        let envelope = BASE64
            .decode(ciphertext.trim())
            .map_err(|e| CryptoError::Decryption(format!("Invalid base64: {}", e)))?;

        if envelope.len() < NONCE_LENGTH + TAG_LENGTH {
            return Err(CryptoError::Decryption(format!(
                "Envelope too short: {} bytes",
                envelope.len()
            )));
        }

        let tag_start = envelope.len() - TAG_LENGTH;
        let sealed = EncryptedData {
            iv: envelope[..NONCE_LENGTH].to_vec(),
            ciphertext: envelope[NONCE_LENGTH..tag_start].to_vec(),
            auth_tag: envelope[tag_start..].to_vec(),
        };

        let plaintext = self.decrypt_aes256gcm(&sealed, self.key.as_bytes())?;
        String::from_utf8(plaintext)
            .map_err(|e| CryptoError::Decryption(format!("Plaintext is not UTF-8: {}", e)))
    }
}

/// One-way password fingerprint: lowercase hex SHA-256.
pub fn hash_password(password: &str) -> String {
    hex::encode(digest::digest(&digest::SHA256, password.as_bytes()))
}

/// `hash_password(password) == digest`.
///
/// Not constant-time; the threat model is a local device.
pub fn verify_password(password: &str, digest: &str) -> bool {
    hash_password(password) == digest
}
