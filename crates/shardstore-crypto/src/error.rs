//! Error taxonomy for the encryption core
//!
//! Every failure here is either a safety violation or a configuration bug, so
//! nothing is ever downgraded to a warning or retried at this layer. Caller-level
//! recovery (re-fetching a segment from another node) lives in the repair layer.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Unsupported cipher selector, or a block size inconsistent with the
    /// cipher's per-block overhead. A programming/configuration defect.
    #[error("invalid encryption config: {0}")]
    InvalidConfig(String),

    /// AEAD tag verification failed on decrypt. Retrying with the same
    /// ciphertext/key/nonce cannot change the outcome.
    #[error("ciphertext authentication failed: wrong key or nonce, or data was tampered with")]
    AuthenticationFailure,

    /// Nonce arithmetic wrapped around its fixed width. Continuing would reuse
    /// a nonce under the same key, so the stream must abort.
    #[error("nonce overflow: block index exceeds the range addressable under this nonce width")]
    NonceOverflow,

    /// Unexpected failure from an underlying primitive. Practically unreachable
    /// for fixed-size keyed hashes, but surfaced rather than swallowed.
    #[error("internal encryption error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_never_contain_key_material() {
        let err = Error::InvalidConfig("cipher suite 7 is not supported".into());
        let msg = err.to_string();
        assert!(msg.contains("invalid encryption config"));

        let msg = Error::AuthenticationFailure.to_string();
        assert!(msg.contains("authentication failed"));
    }
}
