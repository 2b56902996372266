//! Stream padding to a whole number of blocks
//!
//! The transformer layer never pads, so the pipeline rounds the plaintext up
//! to a block multiple before blocking it. Padding is zero bytes terminated by
//! a big-endian `u32` holding the total pad length, which is the
//! [`FRAMING_OVERHEAD`](crate::FRAMING_OVERHEAD) counted by size accounting:
//!
//! ```text
//! [data][0x00 ... 0x00][u32 BE: pad length including these 4 bytes]
//! ```
//!
//! `pad` always appends at least the 4-byte trailer, so
//! `padded_len = data_len + pad_len` is the smallest block multiple at or
//! above `data_len + 4`.

use crate::error::{Error, Result};
use crate::FRAMING_OVERHEAD;

/// Round `data` up to a multiple of `block_size` with a self-describing pad.
pub fn pad(data: &[u8], block_size: usize) -> Result<Vec<u8>> {
    if block_size == 0 {
        return Err(Error::InvalidConfig("block size must be non-zero".into()));
    }

    let mut pad_len = FRAMING_OVERHEAD;
    let remainder = (data.len() + FRAMING_OVERHEAD) % block_size;
    if remainder > 0 {
        pad_len += block_size - remainder;
    }

    let mut padded = Vec::with_capacity(data.len() + pad_len);
    padded.extend_from_slice(data);
    padded.resize(data.len() + pad_len - FRAMING_OVERHEAD, 0);
    padded.extend_from_slice(&(pad_len as u32).to_be_bytes());
    Ok(padded)
}

/// Strip the pad appended by [`pad`].
///
/// The trailer is covered by the AEAD tags of the blocks containing it, so a
/// malformed trailer here means a bug or corruption upstream of decryption,
/// not an attack surface.
pub fn unpad(padded: &[u8], block_size: usize) -> Result<Vec<u8>> {
    if block_size == 0 {
        return Err(Error::InvalidConfig("block size must be non-zero".into()));
    }
    if padded.len() < FRAMING_OVERHEAD || padded.len() % block_size != 0 {
        return Err(Error::InvalidConfig(format!(
            "padded stream of {} bytes is not a multiple of block size {block_size}",
            padded.len()
        )));
    }

    let trailer = &padded[padded.len() - FRAMING_OVERHEAD..];
    let pad_len = u32::from_be_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]) as usize;
    if pad_len < FRAMING_OVERHEAD || pad_len > padded.len() {
        return Err(Error::InvalidConfig(format!(
            "pad trailer claims {pad_len} bytes of padding in a {}-byte stream",
            padded.len()
        )));
    }

    Ok(padded[..padded.len() - pad_len].to_vec())
}
