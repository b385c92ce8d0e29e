//! XChaCha20-Poly1305 sealing for parcel payloads.
//!
//! A sealed payload is laid out as `[nonce(24)] [ciphertext + tag]`.
//! Nonces are drawn from the OS RNG for every seal.

use crate::error::{constants, ParcelError, Result};
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};
use zeroize::{Zeroize, ZeroizeOnDrop};

pub const KEY_SIZE: usize = 32;
pub const NONCE_SIZE: usize = 24;

/// Symmetric sealing key, wiped on drop
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Crypto {
    key: [u8; KEY_SIZE],
}

impl Crypto {
    pub fn new(key: &[u8; KEY_SIZE]) -> Self {
        Self { key: *key }
    }

    /// # Errors
    /// Returns `ParcelError::SecurityError` unless `key` is exactly 32 bytes
    pub fn from_slice(key: &[u8]) -> Result<Self> {
        let key: [u8; KEY_SIZE] = key
            .try_into()
            .map_err(|_| ParcelError::SecurityError(constants::ERR_INVALID_KEY_LENGTH.into()))?;
        Ok(Self { key })
    }

    /// Fresh random key
    pub fn generate_key() -> Result<[u8; KEY_SIZE]> {
        let mut key = [0u8; KEY_SIZE];
        getrandom::fill(&mut key)
            .map_err(|_| ParcelError::SecurityError(constants::ERR_NONCE_GENERATION.into()))?;
        Ok(key)
    }

    pub fn generate_nonce() -> Result<[u8; NONCE_SIZE]> {
        let mut nonce = [0u8; NONCE_SIZE];
        getrandom::fill(&mut nonce)
            .map_err(|_| ParcelError::SecurityError(constants::ERR_NONCE_GENERATION.into()))?;
        Ok(nonce)
    }

    fn cipher(&self) -> XChaCha20Poly1305 {
        XChaCha20Poly1305::new(Key::from_slice(&self.key))
    }

    pub fn encrypt(&self, plaintext: &[u8], nonce: &[u8; NONCE_SIZE]) -> Result<Vec<u8>> {
        self.cipher()
            .encrypt(XNonce::from_slice(nonce), plaintext)
            .map_err(|_| ParcelError::EncryptionFailure)
    }

    pub fn decrypt(&self, ciphertext: &[u8], nonce: &[u8; NONCE_SIZE]) -> Result<Vec<u8>> {
        self.cipher()
            .decrypt(XNonce::from_slice(nonce), ciphertext)
            .map_err(|_| ParcelError::DecryptionFailure)
    }

    /// Encrypt under a fresh nonce and prepend the nonce
    pub fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let nonce = Self::generate_nonce()?;
        let ciphertext = self.encrypt(plaintext, &nonce)?;
        let mut sealed = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);
        Ok(sealed)
    }

    /// Reverse [`seal`](Self::seal)
    ///
    /// # Errors
    /// Returns `ParcelError::DecryptionFailure` if the input is shorter than a
    /// nonce, was tampered with, or was sealed under another key
    pub fn open(&self, sealed: &[u8]) -> Result<Vec<u8>> {
        if sealed.len() < NONCE_SIZE {
            return Err(ParcelError::DecryptionFailure);
        }
        let (nonce, ciphertext) = sealed.split_at(NONCE_SIZE);
        let mut nonce_arr = [0u8; NONCE_SIZE];
        nonce_arr.copy_from_slice(nonce);
        self.decrypt(ciphertext, &nonce_arr)
    }
}

impl std::fmt::Debug for Crypto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Crypto { key: [REDACTED] }")
    }
}
