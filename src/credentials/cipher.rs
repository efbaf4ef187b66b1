//! Authenticated encryption for the saved credential blob, built on
//! ChaCha20-Poly1305. Sealed blobs are stored as version + nonce + ciphertext
//! + auth tag, base64 encoded so the file stays printable.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chacha20poly1305::aead::{Aead, AeadCore, KeyInit, Payload};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use rand::rngs::OsRng;
use thiserror::Error;
use zeroize::Zeroize;

pub const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;
const BLOB_VERSION: u8 = 1;
const ASSOCIATED_DATA: &[u8] = b"omada-monitor/credentials/v1";

#[derive(Debug, Error)]
pub enum CipherError {
    #[error("invalid key length; expected 32 bytes, found {0}")]
    InvalidKeyLength(usize),
    #[error("encryption failed: {0}")]
    EncryptionFailed(String),
    #[error("decryption failed: {0}")]
    DecryptionFailed(String),
    #[error("malformed blob: {0}")]
    Malformed(String),
}

/// Symmetric key holder used to seal and open credential blobs
pub struct CredentialCipher {
    key: Key,
}

impl CredentialCipher {
    /// Fresh random key material from the OS generator
    pub fn generate_key() -> [u8; KEY_LEN] {
        let mut key = ChaCha20Poly1305::generate_key(&mut OsRng);
        let mut bytes = [0u8; KEY_LEN];
        bytes.copy_from_slice(&key);
        key.as_mut_slice().zeroize();
        bytes
    }

    /// Builds a cipher from raw key bytes. The key must be 32 bytes.
    pub fn from_key_bytes(key_bytes: &[u8]) -> Result<Self, CipherError> {
        if key_bytes.len() != KEY_LEN {
            return Err(CipherError::InvalidKeyLength(key_bytes.len()));
        }
        let mut key = Key::default();
        key.copy_from_slice(key_bytes);
        Ok(Self { key })
    }

    /// Encrypts plaintext into a printable sealed blob
    pub fn seal(&self, plaintext: &[u8]) -> Result<String, CipherError> {
        let cipher = ChaCha20Poly1305::new(&self.key);
        let nonce = ChaCha20Poly1305::generate_nonce(&mut OsRng);

        let ciphertext_and_tag = cipher
            .encrypt(&nonce, Payload { msg: plaintext, aad: ASSOCIATED_DATA })
            .map_err(|e| CipherError::EncryptionFailed(format!("{e}")))?;

        let mut blob = Vec::with_capacity(1 + NONCE_LEN + ciphertext_and_tag.len());
        blob.push(BLOB_VERSION);
        blob.extend_from_slice(&nonce);
        blob.extend_from_slice(&ciphertext_and_tag);
        Ok(URL_SAFE_NO_PAD.encode(blob))
    }

    /// Decrypts a sealed blob. Any modification of the blob is rejected.
    pub fn open(&self, sealed: &str) -> Result<Vec<u8>, CipherError> {
        let blob = URL_SAFE_NO_PAD
            .decode(sealed.as_bytes())
            .map_err(|e| CipherError::Malformed(format!("{e}")))?;

        if blob.len() < 1 + NONCE_LEN + TAG_LEN {
            return Err(CipherError::Malformed("blob shorter than header and tag".to_string()));
        }
        if blob[0] != BLOB_VERSION {
            return Err(CipherError::Malformed(format!("unsupported blob version {}", blob[0])));
        }

        let (nonce_bytes, ciphertext_and_tag) = blob[1..].split_at(NONCE_LEN);
        let cipher = ChaCha20Poly1305::new(&self.key);
        cipher
            .decrypt(
                Nonce::from_slice(nonce_bytes),
                Payload { msg: ciphertext_and_tag, aad: ASSOCIATED_DATA },
            )
            .map_err(|e| CipherError::DecryptionFailed(format!("{e}")))
    }
}

impl Drop for CredentialCipher {
    fn drop(&mut self) {
        self.key.as_mut_slice().zeroize();
    }
}
