//! AES-256-GCM backend
//!
//! Block format: `[N bytes: ciphertext][16 bytes: GCM tag]`, nonce for block k
//! = starting nonce + k over the 12-byte AES-GCM nonce width.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce as GcmNonce,
};

use crate::error::{Error, Result};
use crate::key::Key;
use crate::nonce::AesGcmNonce;
use crate::transform::BlockTransformer;
use crate::TAG_SIZE;

/// One-shot AES-256-GCM seal.
pub(crate) fn encrypt_aes_gcm(data: &[u8], key: &Key, nonce: &AesGcmNonce) -> Result<Vec<u8>> {
    let aead = Aes256Gcm::new(key.as_bytes().into());
    aead.encrypt(GcmNonce::from_slice(nonce.as_bytes()), data)
        .map_err(|e| Error::Internal(format!("AES-GCM seal failed: {e}")))
}

/// One-shot AES-256-GCM open. Tag mismatch is an authentication failure, not a
/// generic error.
pub(crate) fn decrypt_aes_gcm(cipher_data: &[u8], key: &Key, nonce: &AesGcmNonce) -> Result<Vec<u8>> {
    let aead = Aes256Gcm::new(key.as_bytes().into());
    aead.decrypt(GcmNonce::from_slice(nonce.as_bytes()), cipher_data)
        .map_err(|_| Error::AuthenticationFailure)
}

/// Nonce for the block at `block_index`, derived without mutating the stream's
/// starting nonce. Wrap-around means the object outgrew the nonce width and the
/// stream must abort.
fn block_nonce(starting_nonce: &AesGcmNonce, block_index: u64) -> Result<AesGcmNonce> {
    let amount = i64::try_from(block_index).map_err(|_| Error::NonceOverflow)?;
    let mut nonce = *starting_nonce;
    if nonce.increment(amount) {
        return Err(Error::NonceOverflow);
    }
    Ok(nonce)
}

fn plain_block_size(encrypted_block_size: usize) -> Result<usize> {
    if encrypted_block_size <= TAG_SIZE {
        return Err(Error::InvalidConfig(format!(
            "encrypted block size {encrypted_block_size} not larger than AES-GCM overhead {TAG_SIZE}"
        )));
    }
    Ok(encrypted_block_size - TAG_SIZE)
}

pub(crate) struct AesGcmEncrypter {
    aead: Aes256Gcm,
    starting_nonce: AesGcmNonce,
    plain_block_size: usize,
}

impl AesGcmEncrypter {
    pub(crate) fn new(
        key: &Key,
        starting_nonce: &AesGcmNonce,
        encrypted_block_size: usize,
    ) -> Result<Self> {
        Ok(Self {
            aead: Aes256Gcm::new(key.as_bytes().into()),
            starting_nonce: *starting_nonce,
            plain_block_size: plain_block_size(encrypted_block_size)?,
        })
    }
}

impl BlockTransformer for AesGcmEncrypter {
    fn in_block_size(&self) -> usize {
        self.plain_block_size
    }

    fn out_block_size(&self) -> usize {
        self.plain_block_size + TAG_SIZE
    }

    fn transform_block(&self, block: &[u8], block_index: u64) -> Result<Vec<u8>> {
        if block.len() > self.plain_block_size {
            return Err(Error::InvalidConfig(format!(
                "plaintext block of {} bytes exceeds block size {}",
                block.len(),
                self.plain_block_size
            )));
        }
        let nonce = block_nonce(&self.starting_nonce, block_index)?;
        self.aead
            .encrypt(GcmNonce::from_slice(nonce.as_bytes()), block)
            .map_err(|e| Error::Internal(format!("AES-GCM seal failed: {e}")))
    }
}

pub(crate) struct AesGcmDecrypter {
    aead: Aes256Gcm,
    starting_nonce: AesGcmNonce,
    plain_block_size: usize,
}

impl AesGcmDecrypter {
    pub(crate) fn new(
        key: &Key,
        starting_nonce: &AesGcmNonce,
        encrypted_block_size: usize,
    ) -> Result<Self> {
        Ok(Self {
            aead: Aes256Gcm::new(key.as_bytes().into()),
            starting_nonce: *starting_nonce,
            plain_block_size: plain_block_size(encrypted_block_size)?,
        })
    }
}

impl BlockTransformer for AesGcmDecrypter {
    fn in_block_size(&self) -> usize {
        self.plain_block_size + TAG_SIZE
    }

    fn out_block_size(&self) -> usize {
        self.plain_block_size
    }

    fn transform_block(&self, block: &[u8], block_index: u64) -> Result<Vec<u8>> {
        if block.len() > self.plain_block_size + TAG_SIZE {
            return Err(Error::InvalidConfig(format!(
                "ciphertext block of {} bytes exceeds block size {}",
                block.len(),
                self.plain_block_size + TAG_SIZE
            )));
        }
        let nonce = block_nonce(&self.starting_nonce, block_index)?;
        self.aead
            .decrypt(GcmNonce::from_slice(nonce.as_bytes()), block)
            .map_err(|_| Error::AuthenticationFailure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::generate_key;
    use crate::AES_GCM_NONCE_SIZE;

    fn test_nonce() -> AesGcmNonce {
        AesGcmNonce::from_bytes([0x11; AES_GCM_NONCE_SIZE])
    }

    #[test]
    fn test_block_roundtrip() {
        let key = generate_key();
        let enc = AesGcmEncrypter::new(&key, &test_nonce(), 1024).unwrap();
        let dec = AesGcmDecrypter::new(&key, &test_nonce(), 1024).unwrap();

        let block = vec![0xC3u8; enc.in_block_size()];
        let sealed = enc.transform_block(&block, 5).unwrap();
        assert_eq!(sealed.len(), enc.out_block_size());
        assert_eq!(dec.transform_block(&sealed, 5).unwrap(), block);
    }

    #[test]
    fn test_random_access_decrypt() {
        let key = generate_key();
        let enc = AesGcmEncrypter::new(&key, &test_nonce(), 256).unwrap();
        let dec = AesGcmDecrypter::new(&key, &test_nonce(), 256).unwrap();

        let blocks: Vec<Vec<u8>> = (0..4u8)
            .map(|i| vec![i; enc.in_block_size()])
            .collect();
        let sealed: Vec<Vec<u8>> = blocks
            .iter()
            .enumerate()
            .map(|(i, b)| enc.transform_block(b, i as u64).unwrap())
            .collect();

        // Block 2 opens without blocks 0 and 1 ever being touched.
        assert_eq!(dec.transform_block(&sealed[2], 2).unwrap(), blocks[2]);
    }

    #[test]
    fn test_wrong_block_index_fails_auth() {
        let key = generate_key();
        let enc = AesGcmEncrypter::new(&key, &test_nonce(), 256).unwrap();
        let dec = AesGcmDecrypter::new(&key, &test_nonce(), 256).unwrap();

        let block = vec![7u8; enc.in_block_size()];
        let sealed = enc.transform_block(&block, 0).unwrap();
        let result = dec.transform_block(&sealed, 1);
        assert!(matches!(result, Err(Error::AuthenticationFailure)));
    }

    #[test]
    fn test_partial_final_block_not_padded() {
        let key = generate_key();
        let enc = AesGcmEncrypter::new(&key, &test_nonce(), 1024).unwrap();

        let partial = vec![1u8; 100];
        let sealed = enc.transform_block(&partial, 0).unwrap();
        assert_eq!(sealed.len(), 100 + TAG_SIZE);
    }

    #[test]
    fn test_block_size_must_exceed_overhead() {
        let key = generate_key();
        for bad in [0, 1, TAG_SIZE] {
            let result = AesGcmEncrypter::new(&key, &test_nonce(), bad);
            assert!(matches!(result, Err(Error::InvalidConfig(_))), "size {bad}");
        }
    }

    #[test]
    fn test_nonce_overflow_is_fatal() {
        let key = generate_key();
        let max = AesGcmNonce::from_bytes([0xFF; AES_GCM_NONCE_SIZE]);
        let enc = AesGcmEncrypter::new(&key, &max, 256).unwrap();

        // Block 0 is still addressable, block 1 would wrap the nonce.
        assert!(enc.transform_block(&[0u8; 16], 0).is_ok());
        let result = enc.transform_block(&[0u8; 16], 1);
        assert!(matches!(result, Err(Error::NonceOverflow)));
    }

    #[test]
    fn test_oneshot_tamper_detected() {
        let key = generate_key();
        let mut sealed = encrypt_aes_gcm(b"payload bytes", &key, &test_nonce()).unwrap();
        sealed[3] ^= 0x01;
        let result = decrypt_aes_gcm(&sealed, &key, &test_nonce());
        assert!(matches!(result, Err(Error::AuthenticationFailure)));
    }
}
