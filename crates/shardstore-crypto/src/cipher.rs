//! Cipher selection and dispatch
//!
//! The cipher suite is chosen once per object and persisted with its metadata,
//! so the set is a closed enum matched exhaustively everywhere: adding a suite
//! is a compile-time-checked change. Selectors arriving from stored metadata
//! come through [`Cipher::try_from`], which is where unsupported tags are
//! rejected.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aesgcm::{decrypt_aes_gcm, encrypt_aes_gcm, AesGcmDecrypter, AesGcmEncrypter};
use crate::error::{Error, Result};
use crate::key::Key;
use crate::nonce::Nonce;
use crate::secretbox::{decrypt_secret_box, encrypt_secret_box, SecretBoxDecrypter, SecretBoxEncrypter};
use crate::transform::{BlockTransformer, Passthrough};

/// Cipher suite used for an object's blocks.
///
/// Persisted as a single byte in object metadata; see the `u8` conversions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cipher {
    /// No encryption, blocks pass through unchanged (e.g. public buckets).
    Unencrypted,
    /// AES-256-GCM, 12-byte nonce, 16-byte tag.
    AesGcm,
    /// XSalsa20-Poly1305, 24-byte nonce, 16-byte tag.
    SecretBox,
}

impl From<Cipher> for u8 {
    fn from(cipher: Cipher) -> u8 {
        match cipher {
            Cipher::Unencrypted => 0,
            Cipher::AesGcm => 1,
            Cipher::SecretBox => 2,
        }
    }
}

impl TryFrom<u8> for Cipher {
    type Error = Error;

    fn try_from(tag: u8) -> Result<Self> {
        match tag {
            0 => Ok(Cipher::Unencrypted),
            1 => Ok(Cipher::AesGcm),
            2 => Ok(Cipher::SecretBox),
            other => Err(Error::InvalidConfig(format!(
                "cipher suite {other} is not supported"
            ))),
        }
    }
}

/// One-shot encrypt of `data` with the given cipher, key and nonce.
///
/// Empty input returns empty output immediately: zero-length payloads stay
/// trivially representable and pay no AEAD overhead.
pub fn encrypt(data: &[u8], cipher: Cipher, key: &Key, nonce: &Nonce) -> Result<Vec<u8>> {
    if data.is_empty() {
        return Ok(Vec::new());
    }

    match cipher {
        Cipher::Unencrypted => Ok(data.to_vec()),
        Cipher::AesGcm => encrypt_aes_gcm(data, key, &nonce.to_aes_gcm()),
        Cipher::SecretBox => encrypt_secret_box(data, key, nonce),
    }
}

/// One-shot decrypt, mirror of [`encrypt`].
pub fn decrypt(cipher_data: &[u8], cipher: Cipher, key: &Key, nonce: &Nonce) -> Result<Vec<u8>> {
    if cipher_data.is_empty() {
        return Ok(Vec::new());
    }

    match cipher {
        Cipher::Unencrypted => Ok(cipher_data.to_vec()),
        Cipher::AesGcm => decrypt_aes_gcm(cipher_data, key, &nonce.to_aes_gcm()),
        Cipher::SecretBox => decrypt_secret_box(cipher_data, key, nonce),
    }
}

/// Build a streaming encrypter bound to (cipher, key, starting nonce, block
/// size).
///
/// AEAD suites consume `encrypted_block_size - TAG_SIZE` plaintext bytes per
/// block; `Unencrypted` passes blocks through with equal in/out sizes.
pub fn new_encrypter(
    cipher: Cipher,
    key: &Key,
    starting_nonce: &Nonce,
    encrypted_block_size: usize,
) -> Result<Box<dyn BlockTransformer + Send + Sync>> {
    debug!(?cipher, encrypted_block_size, "constructing encrypter");
    match cipher {
        Cipher::Unencrypted => Ok(Box::new(Passthrough::new(encrypted_block_size)?)),
        Cipher::AesGcm => Ok(Box::new(AesGcmEncrypter::new(
            key,
            &starting_nonce.to_aes_gcm(),
            encrypted_block_size,
        )?)),
        Cipher::SecretBox => Ok(Box::new(SecretBoxEncrypter::new(
            key,
            starting_nonce,
            encrypted_block_size,
        )?)),
    }
}

/// Build a streaming decrypter, the receive-side mirror of [`new_encrypter`]:
/// its input block size equals the encrypter's output block size and vice
/// versa.
pub fn new_decrypter(
    cipher: Cipher,
    key: &Key,
    starting_nonce: &Nonce,
    encrypted_block_size: usize,
) -> Result<Box<dyn BlockTransformer + Send + Sync>> {
    debug!(?cipher, encrypted_block_size, "constructing decrypter");
    match cipher {
        Cipher::Unencrypted => Ok(Box::new(Passthrough::new(encrypted_block_size)?)),
        Cipher::AesGcm => Ok(Box::new(AesGcmDecrypter::new(
            key,
            &starting_nonce.to_aes_gcm(),
            encrypted_block_size,
        )?)),
        Cipher::SecretBox => Ok(Box::new(SecretBoxDecrypter::new(
            key,
            starting_nonce,
            encrypted_block_size,
        )?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::generate_key;
    use crate::nonce::generate_nonce;
    use crate::TAG_SIZE;

    const ALL_CIPHERS: [Cipher; 3] = [Cipher::Unencrypted, Cipher::AesGcm, Cipher::SecretBox];

    #[test]
    fn test_roundtrip_all_ciphers_all_shapes() {
        let key = generate_key();
        let nonce = generate_nonce();

        for cipher in ALL_CIPHERS {
            for len in [0usize, 1, 31, 1024, 4096 + 17] {
                let data: Vec<u8> = (0..len).map(|i| i as u8).collect();
                let sealed = encrypt(&data, cipher, &key, &nonce).unwrap();
                let opened = decrypt(&sealed, cipher, &key, &nonce).unwrap();
                assert_eq!(opened, data, "cipher {cipher:?}, len {len}");
            }
        }
    }

    #[test]
    fn test_passthrough_identity() {
        let key = generate_key();
        let nonce = generate_nonce();
        let data = b"left exactly as-is";

        assert_eq!(encrypt(data, Cipher::Unencrypted, &key, &nonce).unwrap(), data);
        assert_eq!(decrypt(data, Cipher::Unencrypted, &key, &nonce).unwrap(), data);
    }

    #[test]
    fn test_empty_input_shortcut() {
        let key = generate_key();
        let nonce = generate_nonce();

        for cipher in ALL_CIPHERS {
            assert!(encrypt(&[], cipher, &key, &nonce).unwrap().is_empty());
            assert!(decrypt(&[], cipher, &key, &nonce).unwrap().is_empty());
        }
    }

    #[test]
    fn test_aead_adds_tag_overhead() {
        let key = generate_key();
        let nonce = generate_nonce();
        let data = vec![0u8; 1000];

        for cipher in [Cipher::AesGcm, Cipher::SecretBox] {
            let sealed = encrypt(&data, cipher, &key, &nonce).unwrap();
            assert_eq!(sealed.len(), data.len() + TAG_SIZE, "cipher {cipher:?}");
        }
    }

    #[test]
    fn test_single_byte_flip_detected_everywhere() {
        let key = generate_key();
        let nonce = generate_nonce();
        let data = b"tamper with any byte of this".to_vec();

        for cipher in [Cipher::AesGcm, Cipher::SecretBox] {
            let sealed = encrypt(&data, cipher, &key, &nonce).unwrap();
            for pos in 0..sealed.len() {
                let mut mutated = sealed.clone();
                mutated[pos] ^= 0x01;
                let result = decrypt(&mutated, cipher, &key, &nonce);
                assert!(
                    matches!(result, Err(Error::AuthenticationFailure)),
                    "cipher {cipher:?}, flipped byte {pos}"
                );
            }
        }
    }

    #[test]
    fn test_wrong_nonce_fails_auth() {
        let key = generate_key();
        let nonce = generate_nonce();
        let mut other = nonce;
        assert!(!other.increment(1));

        let sealed = encrypt(b"bound to one nonce", Cipher::AesGcm, &key, &nonce).unwrap();
        let result = decrypt(&sealed, Cipher::AesGcm, &key, &other);
        assert!(matches!(result, Err(Error::AuthenticationFailure)));
    }

    #[test]
    fn test_cipher_tag_encoding() {
        for cipher in ALL_CIPHERS {
            let tag = u8::from(cipher);
            assert_eq!(Cipher::try_from(tag).unwrap(), cipher);
        }

        let result = Cipher::try_from(3);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_encrypter_decrypter_block_sizes_mirror() {
        let key = generate_key();
        let nonce = generate_nonce();

        for cipher in ALL_CIPHERS {
            let enc = new_encrypter(cipher, &key, &nonce, 1024).unwrap();
            let dec = new_decrypter(cipher, &key, &nonce, 1024).unwrap();
            assert_eq!(enc.in_block_size(), dec.out_block_size(), "cipher {cipher:?}");
            assert_eq!(enc.out_block_size(), dec.in_block_size(), "cipher {cipher:?}");
        }
    }
}
