use serde::{Deserialize, Serialize};

/// Raw AES-256-GCM output, split the way `CryptoService` produces it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptedData {
    pub ciphertext: Vec<u8>,
    pub iv: Vec<u8>,
    pub auth_tag: Vec<u8>,
}
