//! Modes of operation over whole blocks.
//!
//! [`Mode`] is the configured choice (ECB, CBC or CTR together with its IV or initial
//! counter). [`Mode::start`] turns it into a [`ModeState`], which carries the chaining value
//! or counter across successive calls so that data processed in several chunks gives the same
//! result as data processed at once.
//!
//! ECB is the headerless file format of this crate: every block is transformed independently, so
//! identical plaintext blocks produce identical ciphertext blocks.

use aes_core::{xor_in_place, Block, BlockCipher, BLOCK_SIZE};
use rand::{CryptoRng, RngCore};

/// A stateful block-chaining strategy. `data` must hold a whole number of blocks.
pub trait BlockMode {
    /// Encrypts every block of `data` in place.
    fn encrypt_blocks<C: BlockCipher>(&mut self, cipher: &C, data: &mut [u8]);
    /// Decrypts every block of `data` in place.
    fn decrypt_blocks<C: BlockCipher>(&mut self, cipher: &C, data: &mut [u8]);
}

/// Configured mode of operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// Each block independently, no chaining.
    #[default]
    Ecb,
    /// Cipher block chaining from `iv`.
    Cbc {
        /// Initialization vector.
        iv: Block,
    },
    /// Counter mode starting at the big-endian 128-bit counter block `nonce`.
    Ctr {
        /// Initial counter block.
        nonce: Block,
    },
}

impl Mode {
    /// CBC with a freshly drawn IV.
    pub fn random_cbc<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut iv = [0u8; BLOCK_SIZE];
        rng.fill_bytes(&mut iv);
        Mode::Cbc { iv }
    }

    /// CTR with a freshly drawn initial counter block.
    pub fn random_ctr<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut nonce = [0u8; BLOCK_SIZE];
        rng.fill_bytes(&mut nonce);
        Mode::Ctr { nonce }
    }

    /// Short lowercase name, as accepted on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Ecb => "ecb",
            Mode::Cbc { .. } => "cbc",
            Mode::Ctr { .. } => "ctr",
        }
    }

    /// Fresh per-operation state.
    pub fn start(&self) -> ModeState {
        match *self {
            Mode::Ecb => ModeState::Ecb(Ecb),
            Mode::Cbc { iv } => ModeState::Cbc(Cbc::new(iv)),
            Mode::Ctr { nonce } => ModeState::Ctr(Ctr::new(nonce)),
        }
    }
}

/// Electronic codebook.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ecb;

impl BlockMode for Ecb {
    fn encrypt_blocks<C: BlockCipher>(&mut self, cipher: &C, data: &mut [u8]) {
        for_each_block(data, |block| cipher.encrypt_block(block));
    }

    fn decrypt_blocks<C: BlockCipher>(&mut self, cipher: &C, data: &mut [u8]) {
        for_each_block(data, |block| cipher.decrypt_block(block));
    }
}

/// Cipher block chaining.
#[derive(Clone, Copy, Debug)]
pub struct Cbc {
    chain: Block,
}

impl Cbc {
    /// Starts a chain at `iv`.
    pub fn new(iv: Block) -> Self {
        Self { chain: iv }
    }
}

impl BlockMode for Cbc {
    fn encrypt_blocks<C: BlockCipher>(&mut self, cipher: &C, data: &mut [u8]) {
        for_each_block(data, |block| {
            xor_in_place(block, &self.chain);
            cipher.encrypt_block(block);
            self.chain = *block;
        });
    }

    fn decrypt_blocks<C: BlockCipher>(&mut self, cipher: &C, data: &mut [u8]) {
        for_each_block(data, |block| {
            let ciphertext = *block;
            cipher.decrypt_block(block);
            xor_in_place(block, &self.chain);
            self.chain = ciphertext;
        });
    }
}

/// Counter mode with a full 128-bit big-endian counter.
#[derive(Clone, Copy, Debug)]
pub struct Ctr {
    counter: u128,
}

impl Ctr {
    /// Starts counting at `nonce`.
    pub fn new(nonce: Block) -> Self {
        Self {
            counter: u128::from_be_bytes(nonce),
        }
    }

    fn apply<C: BlockCipher>(&mut self, cipher: &C, data: &mut [u8]) {
        for_each_block(data, |block| {
            let mut keystream = self.counter.to_be_bytes();
            cipher.encrypt_block(&mut keystream);
            xor_in_place(block, &keystream);
            self.counter = self.counter.wrapping_add(1);
        });
    }
}

impl BlockMode for Ctr {
    fn encrypt_blocks<C: BlockCipher>(&mut self, cipher: &C, data: &mut [u8]) {
        self.apply(cipher, data);
    }

    fn decrypt_blocks<C: BlockCipher>(&mut self, cipher: &C, data: &mut [u8]) {
        self.apply(cipher, data);
    }
}

/// Running state of whichever mode was configured.
#[derive(Clone, Copy, Debug)]
pub enum ModeState {
    /// See [`Ecb`].
    Ecb(Ecb),
    /// See [`Cbc`].
    Cbc(Cbc),
    /// See [`Ctr`].
    Ctr(Ctr),
}

impl BlockMode for ModeState {
    fn encrypt_blocks<C: BlockCipher>(&mut self, cipher: &C, data: &mut [u8]) {
        match self {
            ModeState::Ecb(mode) => mode.encrypt_blocks(cipher, data),
            ModeState::Cbc(mode) => mode.encrypt_blocks(cipher, data),
            ModeState::Ctr(mode) => mode.encrypt_blocks(cipher, data),
        }
    }

    fn decrypt_blocks<C: BlockCipher>(&mut self, cipher: &C, data: &mut [u8]) {
        match self {
            ModeState::Ecb(mode) => mode.decrypt_blocks(cipher, data),
            ModeState::Cbc(mode) => mode.decrypt_blocks(cipher, data),
            ModeState::Ctr(mode) => mode.decrypt_blocks(cipher, data),
        }
    }
}

fn for_each_block(data: &mut [u8], mut f: impl FnMut(&mut Block)) {
    debug_assert_eq!(data.len() % BLOCK_SIZE, 0);
    for chunk in data.chunks_exact_mut(BLOCK_SIZE) {
        let block: &mut Block = chunk.try_into().expect("chunk length is sixteen");
        f(block);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aes_core::{Aes128, Aes128Key};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn sp800_cipher() -> Aes128 {
        Aes128::new(&Aes128Key::from_hex("2b7e151628aed2a6abf7158809cf4f3c").expect("key"))
    }

    fn sp800_plaintext() -> Vec<u8> {
        hex::decode("6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e51")
            .expect("plaintext")
    }

    fn block(hex_str: &str) -> Block {
        hex::decode(hex_str)
            .expect("hex")
            .try_into()
            .expect("16 bytes")
    }

    #[test]
    fn ecb_matches_sp800_38a() {
        let cipher = sp800_cipher();
        let mut data = sp800_plaintext();
        Mode::Ecb.start().encrypt_blocks(&cipher, &mut data);
        assert_eq!(
            hex::encode(&data),
            "3ad77bb40d7a3660a89ecaf32466ef97f5d3d58503b9699de785895a96fdbaaf"
        );
    }

    #[test]
    fn cbc_matches_sp800_38a() {
        let cipher = sp800_cipher();
        let mode = Mode::Cbc {
            iv: block("000102030405060708090a0b0c0d0e0f"),
        };
        let mut data = sp800_plaintext();
        mode.start().encrypt_blocks(&cipher, &mut data);
        assert_eq!(
            hex::encode(&data),
            "7649abac8119b246cee98e9b12e9197d5086cb9b507219ee95db113a917678b2"
        );
        mode.start().decrypt_blocks(&cipher, &mut data);
        assert_eq!(data, sp800_plaintext());
    }

    #[test]
    fn ctr_matches_sp800_38a() {
        let cipher = sp800_cipher();
        let mode = Mode::Ctr {
            nonce: block("f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff"),
        };
        let mut data = sp800_plaintext();
        mode.start().encrypt_blocks(&cipher, &mut data);
        assert_eq!(
            hex::encode(&data),
            "874d6191b620e3261bef6864990db6ce9806f66b7970fdff8617187bb9fffdff"
        );
        mode.start().decrypt_blocks(&cipher, &mut data);
        assert_eq!(data, sp800_plaintext());
    }

    #[test]
    fn ecb_repeats_identical_blocks_cbc_does_not() {
        let cipher = sp800_cipher();
        let mut ecb = [0x42u8; 32];
        Mode::Ecb.start().encrypt_blocks(&cipher, &mut ecb);
        assert_eq!(ecb[..16], ecb[16..]);

        let mut rng = ChaCha20Rng::from_seed([7u8; 32]);
        let mut cbc = [0x42u8; 32];
        Mode::random_cbc(&mut rng)
            .start()
            .encrypt_blocks(&cipher, &mut cbc);
        assert_ne!(cbc[..16], cbc[16..]);
    }

    #[test]
    fn state_carries_across_split_calls() {
        let cipher = sp800_cipher();
        let mut rng = ChaCha20Rng::from_seed([9u8; 32]);
        for mode in [Mode::random_cbc(&mut rng), Mode::random_ctr(&mut rng)] {
            let mut whole = sp800_plaintext();
            mode.start().encrypt_blocks(&cipher, &mut whole);

            let mut split = sp800_plaintext();
            let mut state = mode.start();
            let (first, second) = split.split_at_mut(16);
            state.encrypt_blocks(&cipher, first);
            state.encrypt_blocks(&cipher, second);
            assert_eq!(split, whole, "{}", mode.name());
        }
    }

    #[test]
    fn ctr_counter_wraps() {
        let cipher = sp800_cipher();
        let mut ctr = Ctr::new([0xff; 16]);
        let mut data = [0u8; 32];
        ctr.encrypt_blocks(&cipher, &mut data);
        let mut expected = [0u8; 16];
        cipher.encrypt_block(&mut expected);
        assert_eq!(data[16..], expected);
    }
}
