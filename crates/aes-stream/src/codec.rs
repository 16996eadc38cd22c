//! Keyed entry point tying the cipher to a configuration.

use aes_core::{Aes128, Aes128Key, Block, BlockCipher};

use crate::config::CodecConfig;
use crate::error::Result;
use crate::padding::PaddingCodec;
use crate::stream::StreamCodec;

/// AES-128 cipher plus the settings used to run it over buffers and files.
///
/// Each buffer-level call starts a fresh mode state from the configured IV or counter, so
/// calls are independent of one another.
#[derive(Clone, Debug)]
pub struct Codec {
    cipher: Aes128,
    config: CodecConfig,
}

impl Codec {
    /// Codec with the default configuration (ECB, 256 MB chunks).
    pub fn new(key: &Aes128Key) -> Self {
        Self {
            cipher: Aes128::new(key),
            config: CodecConfig::default(),
        }
    }

    /// Codec with an explicit configuration.
    pub fn with_config(key: &Aes128Key, config: CodecConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            cipher: Aes128::new(key),
            config,
        })
    }

    /// Recomputes the key schedule for `key`.
    pub fn rekey(&mut self, key: &Aes128Key) {
        self.cipher.rekey(key);
    }

    /// The active configuration.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// The underlying block cipher.
    pub fn cipher(&self) -> &Aes128 {
        &self.cipher
    }

    /// Encrypts a single block in place.
    pub fn encrypt_block(&self, block: &mut Block) {
        self.cipher.encrypt_block(block);
    }

    /// Decrypts a single block in place.
    pub fn decrypt_block(&self, block: &mut Block) {
        self.cipher.decrypt_block(block);
    }

    pub(crate) fn stream(&self) -> StreamCodec<'_, Aes128> {
        StreamCodec::new(&self.cipher, self.config.mode.start(), self.config.remainder)
    }

    pub(crate) fn padding(&self) -> PaddingCodec<'_, Aes128> {
        PaddingCodec::new(self.stream(), self.config.padding)
    }

    /// Encrypts `buffer` in place without padding.
    pub fn encrypt_in_place(&self, buffer: &mut [u8]) -> Result<()> {
        self.stream().encrypt_in_place(buffer)
    }

    /// Decrypts `buffer` in place without touching padding.
    pub fn decrypt_in_place(&self, buffer: &mut [u8]) -> Result<()> {
        self.stream().decrypt_in_place(buffer)
    }

    /// Encrypts `src` into the front of `dst` without padding.
    pub fn encrypt_stream(&self, src: &[u8], dst: &mut [u8]) -> Result<()> {
        self.stream().encrypt_copy(src, dst)
    }

    /// Decrypts `src` into the front of `dst` without touching padding.
    pub fn decrypt_stream(&self, src: &[u8], dst: &mut [u8]) -> Result<()> {
        self.stream().decrypt_copy(src, dst)
    }

    /// Encrypts `src` into a new buffer, optionally padded.
    pub fn encrypt(&self, src: &[u8], attach_padding: bool) -> Result<Vec<u8>> {
        self.padding().encrypt(src, attach_padding)
    }

    /// Decrypts `src` into a new buffer, optionally stripping padding.
    pub fn decrypt(&self, src: &[u8], remove_padding: bool) -> Result<Vec<u8>> {
        self.padding().decrypt(src, remove_padding)
    }
}
