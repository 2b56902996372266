//! The block transformer contract shared by every cipher backend
//!
//! A transformer is bound to one (cipher, key, starting nonce, block size)
//! stream. Each call seals or opens exactly one block, and the block index is
//! passed explicitly so any block can be produced without touching the ones
//! before it. Sequential callers can wrap a transformer in [`BlockStream`] to
//! get cursor bookkeeping for free.

use crate::error::{Error, Result};

/// One-block-at-a-time transform over a single stream.
///
/// Implementations are pure per call: the nonce for block `k` is derived from
/// the starting nonce and `k`, never from previous calls. Distinct instances
/// are independent and may be used from different threads.
pub trait BlockTransformer {
    /// Size of the blocks this transformer consumes.
    fn in_block_size(&self) -> usize;

    /// Size of the blocks this transformer produces for a full input block.
    fn out_block_size(&self) -> usize;

    /// Transform the block at `block_index`. A partial final block (shorter
    /// than [`in_block_size`](Self::in_block_size)) is transformed as-is and
    /// yields a correspondingly shorter output, never a padded one.
    fn transform_block(&self, block: &[u8], block_index: u64) -> Result<Vec<u8>>;
}

impl<T: BlockTransformer + ?Sized> BlockTransformer for Box<T> {
    fn in_block_size(&self) -> usize {
        (**self).in_block_size()
    }

    fn out_block_size(&self) -> usize {
        (**self).out_block_size()
    }

    fn transform_block(&self, block: &[u8], block_index: u64) -> Result<Vec<u8>> {
        (**self).transform_block(block, block_index)
    }
}

/// Identity transformer for unencrypted objects.
///
/// Keeps the transformer contract uniform so the upload/download pipeline
/// never special-cases public data: input and output block sizes are equal and
/// blocks pass through untouched.
#[derive(Debug, Clone)]
pub struct Passthrough {
    block_size: usize,
}

impl Passthrough {
    pub fn new(block_size: usize) -> Result<Self> {
        if block_size == 0 {
            return Err(Error::InvalidConfig("block size must be non-zero".into()));
        }
        Ok(Self { block_size })
    }
}

impl BlockTransformer for Passthrough {
    fn in_block_size(&self) -> usize {
        self.block_size
    }

    fn out_block_size(&self) -> usize {
        self.block_size
    }

    fn transform_block(&self, block: &[u8], _block_index: u64) -> Result<Vec<u8>> {
        if block.len() > self.block_size {
            return Err(Error::InvalidConfig(format!(
                "block of {} bytes exceeds block size {}",
                block.len(),
                self.block_size
            )));
        }
        Ok(block.to_vec())
    }
}

/// Sequential cursor over a [`BlockTransformer`].
///
/// Tracks the next block index and enforces the stream shape: a partial block
/// ends the stream, after which further calls are rejected. Not for concurrent
/// use; parallel producers should call
/// [`transform_block`](BlockTransformer::transform_block) directly with
/// explicit indices.
pub struct BlockStream<T> {
    inner: T,
    next_index: u64,
    exhausted: bool,
}

impl<T: BlockTransformer> BlockStream<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            next_index: 0,
            exhausted: false,
        }
    }

    /// Index the next call to [`next_block`](Self::next_block) will use.
    pub fn block_index(&self) -> u64 {
        self.next_index
    }

    pub fn in_block_size(&self) -> usize {
        self.inner.in_block_size()
    }

    pub fn out_block_size(&self) -> usize {
        self.inner.out_block_size()
    }

    /// Transform the next block in stream order.
    pub fn next_block(&mut self, block: &[u8]) -> Result<Vec<u8>> {
        if self.exhausted {
            return Err(Error::InvalidConfig(
                "block stream already ended with a partial block".into(),
            ));
        }

        let out = self.inner.transform_block(block, self.next_index)?;
        self.next_index += 1;
        if block.len() < self.inner.in_block_size() {
            self.exhausted = true;
        }
        Ok(out)
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}
