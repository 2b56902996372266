//! shardstore-crypto: client-side block encryption for shardstore
//!
//! Architecture: Encrypt-then-Stripe with fixed-size authenticated blocks
//!
//! Pipeline: plaintext → pad to block multiple → per-block AEAD seal → erasure-code
//! stripe → upload. On read, any block is independently decryptable because its
//! nonce is computed from the stream's starting nonce plus the block index.
//!
//! Key hierarchy:
//! ```text
//! Master Key (256-bit)
//!   ├── Path/Object Keys (HMAC-SHA512 over the path, truncated to 256-bit)
//!   │   └── Block AEAD: AES-256-GCM or SecretBox (nonce = starting_nonce + block_index)
//!   └── Wrapped Keys (raw key bytes sealed with the same one-shot cipher path)
//! ```
//!
//! Every operation here is a pure, bounded-time transform over in-memory buffers:
//! no network, no disk, no clock. Key material is zeroized on drop and never
//! logged.

pub mod cipher;
pub mod error;
pub mod key;
pub mod nonce;
pub mod pad;
pub mod scheme;
pub mod transform;

mod aesgcm;
mod secretbox;

pub use cipher::{decrypt, encrypt, new_decrypter, new_encrypter, Cipher};
pub use error::{Error, Result};
pub use key::{decrypt_key, derive_key, encrypt_key, generate_key, Key};
pub use nonce::{generate_nonce, AesGcmNonce, Nonce};
pub use pad::{pad, unpad};
pub use scheme::{calc_encrypted_size, EncryptionScheme};
pub use transform::{BlockStream, BlockTransformer};

/// Size of a key in bytes (256-bit)
pub const KEY_SIZE: usize = 32;

/// Size of the nonce carrier in bytes (SecretBox full width)
pub const NONCE_SIZE: usize = 24;

/// Size of an AES-GCM nonce in bytes (truncated view of the carrier)
pub const AES_GCM_NONCE_SIZE: usize = 12;

/// Size of the per-block authentication tag (GCM and Poly1305 alike)
pub const TAG_SIZE: usize = 16;

/// Fixed framing bytes counted toward the first logical block when predicting
/// ciphertext size. Matches the big-endian `u32` trailer written by [`pad`].
pub const FRAMING_OVERHEAD: usize = 4;
