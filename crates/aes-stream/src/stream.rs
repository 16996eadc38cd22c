//! Block-by-block encryption of byte buffers.

use aes_core::{BlockCipher, BLOCK_SIZE};

use crate::config::RemainderPolicy;
use crate::error::{ensure_aligned, Error, Result};
use crate::mode::{BlockMode, ModeState};

/// Applies a block cipher through a mode of operation to consecutive 16-byte blocks.
///
/// The mode state lives as long as the codec, so a buffer fed in several calls is chained as
/// if it had been passed at once.
#[derive(Debug)]
pub struct StreamCodec<'a, C: BlockCipher> {
    cipher: &'a C,
    mode: ModeState,
    remainder: RemainderPolicy,
}

impl<'a, C: BlockCipher> StreamCodec<'a, C> {
    /// Creates a codec over `cipher`.
    pub fn new(cipher: &'a C, mode: ModeState, remainder: RemainderPolicy) -> Self {
        Self {
            cipher,
            mode,
            remainder,
        }
    }

    /// Length of the block-aligned prefix of a `len`-byte buffer, after applying the
    /// remainder policy.
    fn aligned_len(&self, context: &'static str, len: usize) -> Result<usize> {
        if self.remainder == RemainderPolicy::Reject {
            ensure_aligned(context, len)?;
        }
        Ok(len - len % BLOCK_SIZE)
    }

    /// Encrypts `buffer` in place.
    pub fn encrypt_in_place(&mut self, buffer: &mut [u8]) -> Result<()> {
        let aligned = self.aligned_len("plaintext", buffer.len())?;
        self.mode.encrypt_blocks(self.cipher, &mut buffer[..aligned]);
        Ok(())
    }

    /// Decrypts `buffer` in place.
    pub fn decrypt_in_place(&mut self, buffer: &mut [u8]) -> Result<()> {
        let aligned = self.aligned_len("ciphertext", buffer.len())?;
        self.mode.decrypt_blocks(self.cipher, &mut buffer[..aligned]);
        Ok(())
    }

    /// Copies `src` into the front of `dst` and encrypts it there.
    pub fn encrypt_copy(&mut self, src: &[u8], dst: &mut [u8]) -> Result<()> {
        let out = prepare_copy(src, dst)?;
        self.aligned_len("plaintext", src.len())?;
        out.copy_from_slice(src);
        self.encrypt_in_place(out)
    }

    /// Copies `src` into the front of `dst` and decrypts it there.
    pub fn decrypt_copy(&mut self, src: &[u8], dst: &mut [u8]) -> Result<()> {
        let out = prepare_copy(src, dst)?;
        self.aligned_len("ciphertext", src.len())?;
        out.copy_from_slice(src);
        self.decrypt_in_place(out)
    }
}

fn prepare_copy<'d>(src: &[u8], dst: &'d mut [u8]) -> Result<&'d mut [u8]> {
    if dst.len() < src.len() {
        return Err(Error::InvalidArgument(
            "destination is shorter than the source",
        ));
    }
    Ok(&mut dst[..src.len()])
}
