//! SecretBox (XSalsa20-Poly1305) backend
//!
//! Same block shape as the AES-GCM backend (`[ciphertext][16-byte tag]`) but
//! with the full 24-byte nonce width, so far more blocks are addressable before
//! the nonce arithmetic can wrap.

use crypto_secretbox::{
    aead::{Aead, KeyInit},
    Nonce as SecretBoxNonce, XSalsa20Poly1305,
};

use crate::error::{Error, Result};
use crate::key::Key;
use crate::nonce::Nonce;
use crate::transform::BlockTransformer;
use crate::TAG_SIZE;

/// One-shot SecretBox seal.
pub(crate) fn encrypt_secret_box(data: &[u8], key: &Key, nonce: &Nonce) -> Result<Vec<u8>> {
    let aead = XSalsa20Poly1305::new(key.as_bytes().into());
    aead.encrypt(SecretBoxNonce::from_slice(nonce.as_bytes()), data)
        .map_err(|e| Error::Internal(format!("SecretBox seal failed: {e}")))
}

/// One-shot SecretBox open.
pub(crate) fn decrypt_secret_box(cipher_data: &[u8], key: &Key, nonce: &Nonce) -> Result<Vec<u8>> {
    let aead = XSalsa20Poly1305::new(key.as_bytes().into());
    aead.decrypt(SecretBoxNonce::from_slice(nonce.as_bytes()), cipher_data)
        .map_err(|_| Error::AuthenticationFailure)
}

fn block_nonce(starting_nonce: &Nonce, block_index: u64) -> Result<Nonce> {
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
            "encrypted block size {encrypted_block_size} not larger than SecretBox overhead {TAG_SIZE}"
        )));
    }
    Ok(encrypted_block_size - TAG_SIZE)
}

pub(crate) struct SecretBoxEncrypter {
    aead: XSalsa20Poly1305,
    starting_nonce: Nonce,
    plain_block_size: usize,
}

impl SecretBoxEncrypter {
    pub(crate) fn new(key: &Key, starting_nonce: &Nonce, encrypted_block_size: usize) -> Result<Self> {
        Ok(Self {
            aead: XSalsa20Poly1305::new(key.as_bytes().into()),
            starting_nonce: *starting_nonce,
            plain_block_size: plain_block_size(encrypted_block_size)?,
        })
    }
}

impl BlockTransformer for SecretBoxEncrypter {
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
            .encrypt(SecretBoxNonce::from_slice(nonce.as_bytes()), block)
            .map_err(|e| Error::Internal(format!("SecretBox seal failed: {e}")))
    }
}

pub(crate) struct SecretBoxDecrypter {
    aead: XSalsa20Poly1305,
    starting_nonce: Nonce,
    plain_block_size: usize,
}

impl SecretBoxDecrypter {
    pub(crate) fn new(key: &Key, starting_nonce: &Nonce, encrypted_block_size: usize) -> Result<Self> {
        Ok(Self {
            aead: XSalsa20Poly1305::new(key.as_bytes().into()),
            starting_nonce: *starting_nonce,
            plain_block_size: plain_block_size(encrypted_block_size)?,
        })
    }
}

impl BlockTransformer for SecretBoxDecrypter {
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
            .decrypt(SecretBoxNonce::from_slice(nonce.as_bytes()), block)
            .map_err(|_| Error::AuthenticationFailure)
    }
}
