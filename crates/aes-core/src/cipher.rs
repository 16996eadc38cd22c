//! AES-128 key schedule and block encryption/decryption.

use crate::block::Block;
use crate::key::{Aes128Key, RoundKeys, ROUND_KEY_STAGES};
use crate::round::{
    add_round_key, inv_mix_columns, inv_shift_rows, inv_sub_bytes, mix_columns, shift_rows,
    sub_bytes,
};
use crate::sbox::sbox;

/// Number of rounds for a 128-bit key.
pub const ROUNDS: usize = 10;

const RCON: [u8; ROUNDS] = [0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80, 0x1b, 0x36];

/// Derives stage `k` of the schedule from stage `k - 1`, one 4-byte word (column) at a time.
fn next_stage(prev: &Block, rcon: u8) -> Block {
    let mut next = [0u8; 16];

    // RotWord then SubWord on the last word of the previous stage.
    let last = &prev[12..16];
    let temp = [sbox(last[1]) ^ rcon, sbox(last[2]), sbox(last[3]), sbox(last[0])];
    for i in 0..4 {
        next[i] = prev[i] ^ temp[i];
    }

    for word in 1..4 {
        for i in 0..4 {
            next[word * 4 + i] = next[(word - 1) * 4 + i] ^ prev[word * 4 + i];
        }
    }
    next
}

/// Expands a 128-bit key into 11 round keys.
pub fn expand_key(key: &Aes128Key) -> RoundKeys {
    let mut round_keys = [[0u8; 16]; ROUND_KEY_STAGES];
    round_keys[0] = key.0;
    for stage in 1..ROUND_KEY_STAGES {
        round_keys[stage] = next_stage(&round_keys[stage - 1], RCON[stage - 1]);
    }
    RoundKeys(round_keys)
}

/// Encrypts a single 16-byte block in place with pre-expanded round keys.
pub fn encrypt_block(state: &mut Block, round_keys: &RoundKeys) {
    add_round_key(state, round_keys.get(0));

    for round in 1..ROUNDS {
        sub_bytes(state);
        shift_rows(state);
        mix_columns(state);
        add_round_key(state, round_keys.get(round));
    }

    sub_bytes(state);
    shift_rows(state);
    add_round_key(state, round_keys.get(ROUNDS));
}

/// Decrypts a single 16-byte block in place with pre-expanded round keys.
pub fn decrypt_block(state: &mut Block, round_keys: &RoundKeys) {
    add_round_key(state, round_keys.get(ROUNDS));
    for round in (1..ROUNDS).rev() {
        inv_shift_rows(state);
        inv_sub_bytes(state);
        add_round_key(state, round_keys.get(round));
        inv_mix_columns(state);
    }
    inv_shift_rows(state);
    inv_sub_bytes(state);
    add_round_key(state, round_keys.get(0));
}

/// A keyed 16-byte block transform.
pub trait BlockCipher {
    /// Encrypts `block` in place.
    fn encrypt_block(&self, block: &mut Block);
    /// Decrypts `block` in place.
    fn decrypt_block(&self, block: &mut Block);
}

/// AES-128 cipher owning its expanded key schedule.
#[derive(Clone, Debug)]
pub struct Aes128 {
    round_keys: RoundKeys,
}

impl Aes128 {
    /// Expands `key` and returns a ready cipher.
    pub fn new(key: &Aes128Key) -> Self {
        Self {
            round_keys: expand_key(key),
        }
    }

    /// Replaces the whole schedule with one derived from `key`.
    pub fn rekey(&mut self, key: &Aes128Key) {
        self.round_keys = expand_key(key);
    }

    /// The current schedule.
    pub fn round_keys(&self) -> &RoundKeys {
        &self.round_keys
    }
}

impl BlockCipher for Aes128 {
    #[inline]
    fn encrypt_block(&self, block: &mut Block) {
        encrypt_block(block, &self.round_keys);
    }

    #[inline]
    fn decrypt_block(&self, block: &mut Block) {
        decrypt_block(block, &self.round_keys);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::Aes128Key;
    use rand::RngCore;

    const NIST_KEY: [u8; 16] = [
        0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e,
        0x0f,
    ];
    const NIST_PLAIN: [u8; 16] = [
        0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd, 0xee,
        0xff,
    ];
    const NIST_CIPHER: [u8; 16] = [
        0x69, 0xc4, 0xe0, 0xd8, 0x6a, 0x7b, 0x04, 0x30, 0xd8, 0xcd, 0xb7, 0x80, 0x70, 0xb4, 0xc5,
        0x5a,
    ];

    const SP800_KEY: [u8; 16] = [
        0x2b, 0x7e, 0x15, 0x16, 0x28, 0xae, 0xd2, 0xa6, 0xab, 0xf7, 0x15, 0x88, 0x09, 0xcf, 0x4f,
        0x3c,
    ];
    const SP800_PLAIN: [u8; 16] = [
        0x6b, 0xc1, 0xbe, 0xe2, 0x2e, 0x40, 0x9f, 0x96, 0xe9, 0x3d, 0x7e, 0x11, 0x73, 0x93, 0x17,
        0x2a,
    ];
    const SP800_CIPHER: [u8; 16] = [
        0x3a, 0xd7, 0x7b, 0xb4, 0x0d, 0x7a, 0x36, 0x60, 0xa8, 0x9e, 0xca, 0xf3, 0x24, 0x66, 0xef,
        0x97,
    ];

    #[test]
    fn encrypt_matches_nist_vector() {
        let rks = expand_key(&Aes128Key::from(NIST_KEY));
        let mut block = NIST_PLAIN;
        encrypt_block(&mut block, &rks);
        assert_eq!(block, NIST_CIPHER);
    }

    #[test]
    fn decrypt_matches_nist_vector() {
        let rks = expand_key(&Aes128Key::from(NIST_KEY));
        let mut block = NIST_CIPHER;
        decrypt_block(&mut block, &rks);
        assert_eq!(block, NIST_PLAIN);
    }

    #[test]
    fn encrypt_matches_sp800_38a_ecb_vector() {
        let cipher = Aes128::new(&Aes128Key::from(SP800_KEY));
        let mut block = SP800_PLAIN;
        cipher.encrypt_block(&mut block);
        assert_eq!(block, SP800_CIPHER);
        cipher.decrypt_block(&mut block);
        assert_eq!(block, SP800_PLAIN);
    }

    #[test]
    fn key_schedule_last_stage_matches_fips_appendix() {
        let rks = expand_key(&Aes128Key::from(SP800_KEY));
        assert_eq!(rks.len(), 11);
        assert_eq!(rks.get(0), &SP800_KEY);
        assert_eq!(
            rks.get(1),
            &[
                0xa0, 0xfa, 0xfe, 0x17, 0x88, 0x54, 0x2c, 0xb1, 0x23, 0xa3, 0x39, 0x39, 0x2a, 0x6c,
                0x76, 0x05,
            ]
        );
        assert_eq!(
            rks.get(10),
            &[
                0xd0, 0x14, 0xf9, 0xa8, 0xc9, 0xee, 0x25, 0x89, 0xe1, 0x3f, 0x0c, 0xc8, 0xb6, 0x63,
                0x0c, 0xa6,
            ]
        );
    }

    #[test]
    fn schedule_always_has_eleven_stages() {
        let mut rng = rand::thread_rng();
        for _ in 0..16 {
            let mut key = [0u8; 16];
            rng.fill_bytes(&mut key);
            let rks = expand_key(&Aes128Key::from(key));
            assert_eq!(rks.iter().count(), 11);
            assert!(rks.iter().all(|stage| stage.len() == 16));
        }
    }

    #[test]
    fn encrypt_decrypt_round_trip_random() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let mut key_bytes = [0u8; 16];
            let mut block = [0u8; 16];
            rng.fill_bytes(&mut key_bytes);
            rng.fill_bytes(&mut block);
            let rks = expand_key(&Aes128Key::from(key_bytes));
            let mut state = block;
            encrypt_block(&mut state, &rks);
            decrypt_block(&mut state, &rks);
            assert_eq!(state, block);
        }
    }

    #[test]
    fn encryption_is_deterministic() {
        let cipher = Aes128::new(&Aes128Key::from(NIST_KEY));
        let mut first = NIST_PLAIN;
        let mut second = NIST_PLAIN;
        cipher.encrypt_block(&mut first);
        cipher.encrypt_block(&mut second);
        assert_eq!(first, second);
    }

    #[test]
    fn rekey_replaces_schedule() {
        let mut cipher = Aes128::new(&Aes128Key::from(NIST_KEY));
        cipher.rekey(&Aes128Key::from(SP800_KEY));
        assert_eq!(cipher.round_keys(), &expand_key(&Aes128Key::from(SP800_KEY)));
        let mut block = SP800_PLAIN;
        cipher.encrypt_block(&mut block);
        assert_eq!(block, SP800_CIPHER);
    }
}
