//! Encryption scheme descriptor and ciphertext size accounting
//!
//! The scheme (cipher + encrypted block size) is persisted as object metadata:
//! it is everything needed to reconstruct a compatible transformer later, and
//! everything needed to predict ciphertext size before a key even exists.
//! Downstream erasure-coding striping allocates from that prediction, so it
//! must match the real encrypt path bit-exactly.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::cipher::{new_encrypter, Cipher};
use crate::error::Result;
use crate::key::Key;
use crate::nonce::Nonce;
use crate::transform::BlockTransformer;
use crate::{FRAMING_OVERHEAD, KEY_SIZE};

/// How an object's ciphertext was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptionScheme {
    pub cipher: Cipher,
    /// Encrypted block size in bytes (plaintext block plus AEAD overhead).
    pub block_size: u32,
}

/// Predict the ciphertext size of `data_size` plaintext bytes under `scheme`.
///
/// Builds a throwaway encrypter from a zero key and nonce (only the block
/// sizes matter) and counts whole output blocks, with the padding layer's
/// 4-byte framing trailer folded into the plaintext:
/// `ceil((data_size + 4) / in_block_size) * out_block_size`.
pub fn calc_encrypted_size(data_size: u64, scheme: &EncryptionScheme) -> Result<u64> {
    let transformer = new_encrypter(
        scheme.cipher,
        &Key::from_bytes([0u8; KEY_SIZE]),
        &Nonce::default(),
        scheme.block_size as usize,
    )?;

    let in_block_size = transformer.in_block_size() as u64;
    let out_block_size = transformer.out_block_size() as u64;
    let blocks = (data_size + FRAMING_OVERHEAD as u64).div_ceil(in_block_size);
    let encrypted_size = blocks * out_block_size;

    trace!(data_size, blocks, encrypted_size, "predicted ciphertext size");
    Ok(encrypted_size)
}
