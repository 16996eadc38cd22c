//! PKCS#7-style padding around the stream codec.
//!
//! Removal is unauthenticated: under [`PaddingCheck::Lenient`] a corrupted ciphertext decrypts
//! to a wrong length instead of an error. Pair the output with a MAC if that matters.

use aes_core::{BlockCipher, BLOCK_SIZE};

use crate::config::PaddingCheck;
use crate::error::{ensure_aligned, Error, Result};
use crate::stream::StreamCodec;

/// Number of pad bytes appended to a `len`-byte message: 1..=16, never zero.
pub fn pad_len(len: usize) -> usize {
    BLOCK_SIZE - len % BLOCK_SIZE
}

/// Returns `src` followed by its padding.
pub fn pad(src: &[u8]) -> Vec<u8> {
    let pad = pad_len(src.len());
    let mut out = Vec::with_capacity(src.len() + pad);
    out.extend_from_slice(src);
    out.resize(src.len() + pad, pad as u8);
    out
}

/// Length of the message inside a decrypted, padded buffer.
pub fn unpadded_len(buffer: &[u8], check: PaddingCheck) -> Result<usize> {
    let len = buffer.len();
    let value = *buffer
        .last()
        .ok_or(Error::InvalidArgument("padded buffer is empty"))?;
    let pad = value as usize;
    let invalid = Error::InvalidPadding { value, len };

    if pad > len {
        return Err(invalid);
    }
    if check == PaddingCheck::Strict
        && (pad == 0 || pad > BLOCK_SIZE || buffer[len - pad..].iter().any(|&b| b != value))
    {
        return Err(invalid);
    }
    Ok(len - pad)
}

/// Stream codec with padding attached on encryption and stripped on decryption.
#[derive(Debug)]
pub struct PaddingCodec<'a, C: BlockCipher> {
    stream: StreamCodec<'a, C>,
    check: PaddingCheck,
}

impl<'a, C: BlockCipher> PaddingCodec<'a, C> {
    /// Wraps `stream`.
    pub fn new(stream: StreamCodec<'a, C>, check: PaddingCheck) -> Self {
        Self { stream, check }
    }

    /// Encrypts `src` into a new buffer, appending padding first when `attach_padding` is set.
    pub fn encrypt(&mut self, src: &[u8], attach_padding: bool) -> Result<Vec<u8>> {
        if src.is_empty() {
            return Err(Error::InvalidArgument("source is empty"));
        }
        let mut out = if attach_padding {
            pad(src)
        } else {
            src.to_vec()
        };
        self.stream.encrypt_in_place(&mut out)?;
        Ok(out)
    }

    /// Decrypts `src` into a new buffer and, when `remove_padding` is set, truncates it to the
    /// message length recorded in the padding.
    pub fn decrypt(&mut self, src: &[u8], remove_padding: bool) -> Result<Vec<u8>> {
        if src.is_empty() {
            return Err(Error::InvalidArgument("source is empty"));
        }
        ensure_aligned("ciphertext", src.len())?;
        let mut out = src.to_vec();
        self.stream.decrypt_in_place(&mut out)?;
        if remove_padding {
            let len = unpadded_len(&out, self.check)?;
            out.truncate(len);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RemainderPolicy;
    use crate::mode::Mode;
    use aes_core::{Aes128, Aes128Key};

    fn codec(cipher: &Aes128, check: PaddingCheck) -> PaddingCodec<'_, Aes128> {
        PaddingCodec::new(
            StreamCodec::new(cipher, Mode::Ecb.start(), RemainderPolicy::Reject),
            check,
        )
    }

    #[test]
    fn pad_length_rules() {
        assert_eq!(pad_len(0), 16);
        assert_eq!(pad_len(1), 15);
        assert_eq!(pad_len(15), 1);
        assert_eq!(pad_len(16), 16);
        assert_eq!(pad_len(33), 15);
    }

    #[test]
    fn pad_fills_with_count() {
        let padded = pad(b"hello");
        assert_eq!(padded.len(), 16);
        assert_eq!(&padded[..5], b"hello");
        assert!(padded[5..].iter().all(|&b| b == 11));

        let full = pad(&[1u8; 16]);
        assert_eq!(full.len(), 32);
        assert!(full[16..].iter().all(|&b| b == 16));
    }

    #[test]
    fn padded_round_trip_all_small_lengths() {
        let cipher = Aes128::new(&Aes128Key::from_text("padding"));
        for len in 1..=48usize {
            let src: Vec<u8> = (0..len).map(|i| i as u8).collect();
            let ct = codec(&cipher, PaddingCheck::Lenient)
                .encrypt(&src, true)
                .expect("encrypt");
            assert_eq!(ct.len(), len + pad_len(len));
            let pt = codec(&cipher, PaddingCheck::Strict)
                .decrypt(&ct, true)
                .expect("decrypt");
            assert_eq!(pt, src, "length {len}");
        }
    }

    #[test]
    fn decrypt_rejects_unaligned_length() {
        let cipher = Aes128::new(&Aes128Key::from_text("padding"));
        let err = codec(&cipher, PaddingCheck::Lenient)
            .decrypt(&[0u8; 17], true)
            .unwrap_err();
        assert!(matches!(err, Error::MalformedLength { actual: 17, .. }));
    }

    #[test]
    fn empty_source_is_invalid() {
        let cipher = Aes128::new(&Aes128Key::from_text("padding"));
        let mut codec = codec(&cipher, PaddingCheck::Lenient);
        assert!(matches!(codec.encrypt(&[], true), Err(Error::InvalidArgument(_))));
        assert!(matches!(codec.decrypt(&[], true), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn unpadded_encrypt_keeps_length() {
        let cipher = Aes128::new(&Aes128Key::from_text("padding"));
        let ct = codec(&cipher, PaddingCheck::Lenient)
            .encrypt(&[3u8; 32], false)
            .expect("encrypt");
        assert_eq!(ct.len(), 32);
        let pt = codec(&cipher, PaddingCheck::Lenient)
            .decrypt(&ct, false)
            .expect("decrypt");
        assert_eq!(pt, vec![3u8; 32]);
    }

    #[test]
    fn lenient_check_trusts_last_byte() {
        let mut buffer = [0xaau8; 32];
        buffer[31] = 3;
        assert_eq!(unpadded_len(&buffer, PaddingCheck::Lenient).expect("len"), 29);
        assert!(matches!(
            unpadded_len(&buffer, PaddingCheck::Strict),
            Err(Error::InvalidPadding { value: 3, .. })
        ));
        buffer[31] = 0;
        assert_eq!(unpadded_len(&buffer, PaddingCheck::Lenient).expect("len"), 32);
        buffer[31] = 200;
        assert!(matches!(
            unpadded_len(&buffer, PaddingCheck::Lenient),
            Err(Error::InvalidPadding { value: 200, len: 32 })
        ));
    }

    #[test]
    fn corrupted_ciphertext_decrypts_without_error_under_lenient_check() {
        let cipher = Aes128::new(&Aes128Key::from_text("padding"));
        let mut ct = codec(&cipher, PaddingCheck::Lenient)
            .encrypt(b"two blocks of message", true)
            .expect("encrypt");
        ct[0] ^= 0x01;
        // Only the first block is damaged; the pad byte in the last block survives.
        let pt = codec(&cipher, PaddingCheck::Lenient)
            .decrypt(&ct, true)
            .expect("no integrity check");
        assert_eq!(pt.len(), 21);
        assert_ne!(&pt[..16], b"two blocks of me");
        assert_eq!(&pt[16..], b"ssage");
    }
}
