//! AES round transformations over a column-major state.

use crate::block::{at, xor_in_place, Block};
use crate::gf::gf_mul;
use crate::sbox::{inv_sbox, sbox};

/// Forward MDS matrix used by MixColumns.
pub const MDS: [[u8; 4]; 4] = [[2, 3, 1, 1], [1, 2, 3, 1], [1, 1, 2, 3], [3, 1, 1, 2]];

/// Inverse MDS matrix used by InvMixColumns.
pub const INV_MDS: [[u8; 4]; 4] = [
    [14, 11, 13, 9],
    [9, 14, 11, 13],
    [13, 9, 14, 11],
    [11, 13, 9, 14],
];

/// Applies SubBytes to the state in place.
#[inline]
pub fn sub_bytes(state: &mut Block) {
    for byte in state.iter_mut() {
        *byte = sbox(*byte);
    }
}

/// Applies the inverse SubBytes transformation.
#[inline]
pub fn inv_sub_bytes(state: &mut Block) {
    for byte in state.iter_mut() {
        *byte = inv_sbox(*byte);
    }
}

/// Performs ShiftRows in place: row `r` rotates left by `r` positions.
#[inline]
pub fn shift_rows(state: &mut Block) {
    let src = *state;
    for column in 0..4 {
        for row in 1..4 {
            state[column * 4 + row] = at(&src, row, (column + row) % 4);
        }
    }
}

/// Performs the inverse of ShiftRows in place: row `r` rotates right by `r` positions.
#[inline]
pub fn inv_shift_rows(state: &mut Block) {
    let src = *state;
    for column in 0..4 {
        for row in 1..4 {
            state[column * 4 + row] = at(&src, row, (column + 4 - row) % 4);
        }
    }
}

fn mix_single_column(col: &mut [u8], matrix: &[[u8; 4]; 4]) {
    let input = [col[0], col[1], col[2], col[3]];
    for (out, coefficients) in col.iter_mut().zip(matrix.iter()) {
        *out = coefficients
            .iter()
            .zip(input.iter())
            .fold(0u8, |acc, (&m, &x)| acc ^ gf_mul(m, x));
    }
}

/// MixColumns over all four columns.
#[inline]
pub fn mix_columns(state: &mut Block) {
    for column in state.chunks_exact_mut(4) {
        mix_single_column(column, &MDS);
    }
}

/// Inverse MixColumns over all four columns.
#[inline]
pub fn inv_mix_columns(state: &mut Block) {
    for column in state.chunks_exact_mut(4) {
        mix_single_column(column, &INV_MDS);
    }
}

/// Adds (XORs) a round key into the state.
#[inline]
pub fn add_round_key(state: &mut Block, round_key: &Block) {
    xor_in_place(state, round_key);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    const COUNTING: Block = [
        0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e,
        0x0f,
    ];

    #[test]
    fn shift_rows_rotates_each_row() {
        let mut state = COUNTING;
        shift_rows(&mut state);
        assert_eq!(
            state,
            [
                0x00, 0x05, 0x0a, 0x0f, 0x04, 0x09, 0x0e, 0x03, 0x08, 0x0d, 0x02, 0x07, 0x0c, 0x01,
                0x06, 0x0b,
            ]
        );
        inv_shift_rows(&mut state);
        assert_eq!(state, COUNTING);
    }

    #[test]
    fn mix_columns_known_column() {
        // FIPS-197 worked column: db 13 53 45 -> 8e 4d a1 bc
        let mut state = [0u8; 16];
        state[..4].copy_from_slice(&[0xdb, 0x13, 0x53, 0x45]);
        state[4..8].copy_from_slice(&[0xf2, 0x0a, 0x22, 0x5c]);
        state[8..12].copy_from_slice(&[0x01, 0x01, 0x01, 0x01]);
        state[12..].copy_from_slice(&[0xc6, 0xc6, 0xc6, 0xc6]);
        mix_columns(&mut state);
        assert_eq!(&state[..4], &[0x8e, 0x4d, 0xa1, 0xbc]);
        assert_eq!(&state[4..8], &[0x9f, 0xdc, 0x58, 0x9d]);
        assert_eq!(&state[8..12], &[0x01, 0x01, 0x01, 0x01]);
        assert_eq!(&state[12..], &[0xc6, 0xc6, 0xc6, 0xc6]);
    }

    #[test]
    fn inverse_mix_columns_undoes_forward() {
        let mut rng = rand::thread_rng();
        for _ in 0..64 {
            let mut block = [0u8; 16];
            rng.fill_bytes(&mut block);
            let mut state = block;
            mix_columns(&mut state);
            inv_mix_columns(&mut state);
            assert_eq!(state, block);
        }
    }

    #[test]
    fn sub_bytes_round_trip() {
        let mut state = COUNTING;
        sub_bytes(&mut state);
        assert_eq!(state[0], 0x63);
        inv_sub_bytes(&mut state);
        assert_eq!(state, COUNTING);
    }

    #[test]
    fn add_round_key_is_involution() {
        let key = [0xa5u8; 16];
        let mut state = COUNTING;
        add_round_key(&mut state, &key);
        assert_eq!(state[1], 0x01 ^ 0xa5);
        add_round_key(&mut state, &key);
        assert_eq!(state, COUNTING);
    }
}
