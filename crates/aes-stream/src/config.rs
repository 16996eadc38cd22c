//! Codec configuration.

use aes_core::BLOCK_SIZE;
use log::debug;

use crate::error::{Error, Result};
use crate::mode::Mode;

/// Largest chunk read from a file at once (256 MB). Must stay a multiple of 16.
pub const DEFAULT_CHUNK_SIZE: usize = 256 * 1_000_000;

/// What to do with the bytes past the last whole block of an unpadded buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RemainderPolicy {
    /// Fail with [`Error::MalformedLength`] before touching the buffer.
    #[default]
    Reject,
    /// Leave the trailing bytes as they are.
    PassThrough,
}

/// How much to trust the pad count read back after decryption.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PaddingCheck {
    /// Use the last byte as the pad count; only counts longer than the buffer are rejected.
    #[default]
    Lenient,
    /// Require a count in 1..=16 and every pad byte equal to it.
    Strict,
}

/// Settings shared by the stream, padding and file codecs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodecConfig {
    /// Maximum bytes read, transformed and written per file chunk.
    pub chunk_size: usize,
    /// Mode of operation.
    pub mode: Mode,
    /// Handling of unaligned unpadded input.
    pub remainder: RemainderPolicy,
    /// Padding verification on removal.
    pub padding: PaddingCheck,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            mode: Mode::Ecb,
            remainder: RemainderPolicy::Reject,
            padding: PaddingCheck::Lenient,
        }
    }
}

impl CodecConfig {
    /// Checks that the chunk size is a non-zero multiple of the block size.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 || self.chunk_size % BLOCK_SIZE != 0 {
            return Err(Error::InvalidArgument(
                "chunk size must be a non-zero multiple of 16",
            ));
        }
        debug!(
            "codec config: mode={} chunk_size={} remainder={:?} padding={:?}",
            self.mode.name(),
            self.chunk_size,
            self.remainder,
            self.padding
        );
        Ok(())
    }
}
