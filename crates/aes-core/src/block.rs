//! Block representation helpers.

/// Number of bytes in an AES block.
pub const BLOCK_SIZE: usize = 16;

/// AES block of 16 bytes, a 4×4 matrix stored column-major (`index = column * 4 + row`).
pub type Block = [u8; BLOCK_SIZE];

/// XORs two blocks, writing the result into `dst`.
#[inline]
pub fn xor_in_place(dst: &mut Block, rhs: &Block) {
    for (d, r) in dst.iter_mut().zip(rhs.iter()) {
        *d ^= *r;
    }
}

/// Returns the byte at `row`, `column` of the state matrix.
#[inline]
pub fn at(state: &Block, row: usize, column: usize) -> u8 {
    state[column * 4 + row]
}
