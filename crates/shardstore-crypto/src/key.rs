//! Key type, per-path key derivation, and key wrapping
//!
//! One master key fans out into per-object keys via HMAC-SHA512, so no
//! per-object key ever needs to be stored in the clear. Raw key material going
//! into metadata is wrapped with the same one-shot cipher path as payload data,
//! so there is no separate key-wrapping algorithm to maintain.

use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha512;
use zeroize::Zeroize;

use crate::cipher::{decrypt, encrypt, Cipher};
use crate::error::{Error, Result};
use crate::nonce::Nonce;
use crate::KEY_SIZE;

type HmacSha512 = Hmac<Sha512>;

/// A 256-bit secret key. Zeroized on drop, redacted in Debug output.
#[derive(Clone)]
pub struct Key {
    bytes: [u8; KEY_SIZE],
}

impl Key {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl Drop for Key {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Key")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Generate a random 256-bit key.
pub fn generate_key() -> Key {
    let mut bytes = [0u8; KEY_SIZE];
    rand::thread_rng().fill_bytes(&mut bytes);
    Key::from_bytes(bytes)
}

/// Derive a new key from `key` and `message` via HMAC-SHA512.
///
/// Deterministic: the same `(key, message)` pair always yields the same derived
/// key, which is what lets one master key address a whole path hierarchy
/// without persisting per-object keys. The 512-bit digest is truncated to
/// [`KEY_SIZE`].
pub fn derive_key(key: &Key, message: &[u8]) -> Result<Key> {
    let mut mac = HmacSha512::new_from_slice(key.as_bytes())
        .map_err(|e| Error::Internal(format!("HMAC-SHA512 init failed: {e}")))?;
    mac.update(message);
    let digest = mac.finalize().into_bytes();

    let mut derived = [0u8; KEY_SIZE];
    derived.copy_from_slice(&digest[..KEY_SIZE]);
    Ok(Key::from_bytes(derived))
}

/// Wrap a raw key's bytes with the one-shot cipher path.
///
/// The output is ordinary ciphertext (key bytes plus the cipher's tag
/// overhead), suitable for storing in object metadata.
pub fn encrypt_key(key_to_encrypt: &Key, cipher: Cipher, key: &Key, nonce: &Nonce) -> Result<Vec<u8>> {
    encrypt(key_to_encrypt.as_bytes(), cipher, key, nonce)
}

/// Unwrap a key previously wrapped by [`encrypt_key`].
pub fn decrypt_key(encrypted: &[u8], cipher: Cipher, key: &Key, nonce: &Nonce) -> Result<Key> {
    let mut plain = decrypt(encrypted, cipher, key, nonce)?;

    if plain.len() != KEY_SIZE {
        plain.zeroize();
        return Err(Error::Internal(format!(
            "unwrapped key has wrong size: {} bytes (expected {KEY_SIZE})",
            plain.len()
        )));
    }

    let mut bytes = [0u8; KEY_SIZE];
    bytes.copy_from_slice(&plain);
    plain.zeroize();

    Ok(Key::from_bytes(bytes))
}
