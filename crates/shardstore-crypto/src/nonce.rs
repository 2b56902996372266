//! Nonce carrier and fixed-width nonce arithmetic
//!
//! A nonce is a little-endian fixed-width unsigned integer. Each block of a
//! stream is sealed under `starting_nonce + block_index`, which is what makes
//! block *k* decryptable without touching blocks `0..k`. The arithmetic reports
//! wrap-around instead of masking it: a wrapped nonce under the same key is a
//! broken stream, and callers must abort (see [`Error::NonceOverflow`]).
//!
//! [`Error::NonceOverflow`]: crate::Error::NonceOverflow

use rand::RngCore;

use crate::{AES_GCM_NONCE_SIZE, NONCE_SIZE};

/// The full-width nonce carrier (24 bytes, SecretBox width).
///
/// AES-GCM uses only the first 12 bytes, via [`Nonce::to_aes_gcm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Nonce([u8; NONCE_SIZE]);

impl Nonce {
    pub fn from_bytes(bytes: [u8; NONCE_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; NONCE_SIZE] {
        &self.0
    }

    /// Add `amount` to the nonce in place (negative amounts rewind).
    ///
    /// Returns `true` if the addition wrapped around the fixed width. A wrapped
    /// result means potential nonce reuse and must never be used for
    /// encryption.
    pub fn increment(&mut self, amount: i64) -> bool {
        increment_bytes(&mut self.0, amount)
    }

    /// Truncate to the 12-byte AES-GCM view.
    pub fn to_aes_gcm(&self) -> AesGcmNonce {
        let mut bytes = [0u8; AES_GCM_NONCE_SIZE];
        bytes.copy_from_slice(&self.0[..AES_GCM_NONCE_SIZE]);
        AesGcmNonce(bytes)
    }
}

/// The 12-byte nonce AES-GCM actually consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AesGcmNonce([u8; AES_GCM_NONCE_SIZE]);

impl AesGcmNonce {
    pub fn from_bytes(bytes: [u8; AES_GCM_NONCE_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; AES_GCM_NONCE_SIZE] {
        &self.0
    }

    /// Same arithmetic as [`Nonce::increment`], over the truncated width.
    pub fn increment(&mut self, amount: i64) -> bool {
        increment_bytes(&mut self.0, amount)
    }
}

/// Generate a random starting nonce for a new stream.
pub fn generate_nonce() -> Nonce {
    let mut bytes = [0u8; NONCE_SIZE];
    rand::thread_rng().fill_bytes(&mut bytes);
    Nonce::from_bytes(bytes)
}

/// Treat `buf` as a little-endian unsigned integer and add `amount` in place.
///
/// Returns `true` when the result wrapped around the width of `buf` (overflow
/// for positive amounts, underflow for negative ones). `amount == 0` is a
/// no-op.
pub(crate) fn increment_bytes(buf: &mut [u8], amount: i64) -> bool {
    if amount >= 0 {
        let mut carry = amount as u64;
        for byte in buf.iter_mut() {
            if carry == 0 {
                break;
            }
            let sum = u64::from(*byte) + (carry & 0xff);
            *byte = sum as u8;
            carry = (carry >> 8) + (sum >> 8);
        }
        carry != 0
    } else {
        let mut borrow = amount.unsigned_abs();
        for byte in buf.iter_mut() {
            if borrow == 0 {
                break;
            }
            let sub = borrow & 0xff;
            let cur = u64::from(*byte);
            if cur >= sub {
                *byte = (cur - sub) as u8;
                borrow >>= 8;
            } else {
                *byte = (cur + 0x100 - sub) as u8;
                borrow = (borrow >> 8) + 1;
            }
        }
        borrow != 0
    }
}
