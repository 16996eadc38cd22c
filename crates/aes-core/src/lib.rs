//! AES-128 block cipher core.
//!
//! This crate follows the FIPS-197 specification and provides:
//! - GF(2^8) arithmetic and the forward/inverse S-boxes.
//! - The four round layers (SubBytes, ShiftRows, MixColumns, AddRoundKey).
//! - Key schedule for AES-128 and single-block encryption and decryption.
//! - The [`BlockCipher`] trait and the keyed [`Aes128`] cipher object.
//!
//! The implementation aims for clarity and testability rather than constant-time
//! guarantees; it should not be treated as side-channel hardened.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod block;
mod cipher;
mod gf;
mod key;
mod round;
mod sbox;

pub use crate::block::{xor_in_place, Block, BLOCK_SIZE};
pub use crate::cipher::{decrypt_block, encrypt_block, expand_key, Aes128, BlockCipher, ROUNDS};
pub use crate::gf::{gf_mul, gf_mul_generic, xtime};
pub use crate::key::{Aes128Key, KeyError, RoundKeys, ROUND_KEY_STAGES};
pub use crate::round::{
    add_round_key, inv_mix_columns, inv_shift_rows, inv_sub_bytes, mix_columns, shift_rows,
    sub_bytes,
};
pub use crate::sbox::{inv_sbox, sbox};
