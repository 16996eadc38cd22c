//! Key types for AES-128.

use thiserror::Error;

use crate::block::Block;

/// Number of round-key stages produced for AES-128 (10 rounds plus initial whitening).
pub const ROUND_KEY_STAGES: usize = 11;

/// Errors raised while building a key from external input.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum KeyError {
    /// The input was not valid hexadecimal.
    #[error("key is not valid hex: {0}")]
    Hex(#[from] hex::FromHexError),
    /// The decoded key had the wrong number of bytes.
    #[error("AES-128 key must be 16 bytes, got {0}")]
    Length(usize),
}

/// AES-128 key wrapper.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Aes128Key(pub [u8; 16]);

impl Aes128Key {
    /// Builds a key from a text value: shorter input is right-padded with zero bytes, longer
    /// input is truncated to the first 16 bytes.
    pub fn from_text(text: &str) -> Self {
        let mut key = [0u8; 16];
        for (dst, src) in key.iter_mut().zip(text.as_bytes()) {
            *dst = *src;
        }
        Self(key)
    }

    /// Parses a key from exactly 32 hex characters.
    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str.trim())?;
        Self::try_from(bytes.as_slice())
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl From<[u8; 16]> for Aes128Key {
    fn from(value: [u8; 16]) -> Self {
        Self(value)
    }
}

impl TryFrom<&[u8]> for Aes128Key {
    type Error = KeyError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let bytes: [u8; 16] = value
            .try_into()
            .map_err(|_| KeyError::Length(value.len()))?;
        Ok(Self(bytes))
    }
}

/// Expanded round keys for AES-128, each stage in the column-major block layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundKeys(pub [Block; ROUND_KEY_STAGES]);

impl RoundKeys {
    /// Returns the round key at the requested index (0..=10).
    #[inline]
    pub fn get(&self, round: usize) -> &Block {
        &self.0[round]
    }

    /// Number of stages; always 11.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; present for API symmetry with `len`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterates over the stages in round order.
    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        self.0.iter()
    }
}
