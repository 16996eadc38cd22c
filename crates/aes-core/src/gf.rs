//! Byte arithmetic in GF(2^8) modulo x^8 + x^4 + x^3 + x + 1.

/// Low byte of the reduction polynomial, folded in when a doubling overflows.
const REDUCTION: u8 = 0x1b;

/// Doubles `byte` in GF(2^8).
#[inline]
pub const fn xtime(byte: u8) -> u8 {
    let shifted = byte << 1;
    if byte & 0x80 != 0 {
        shifted ^ REDUCTION
    } else {
        shifted
    }
}

/// Shift-and-add multiplication of two arbitrary field elements.
pub const fn gf_mul_generic(mut a: u8, mut b: u8) -> u8 {
    let mut product = 0u8;
    while b != 0 {
        if b & 1 != 0 {
            product ^= a;
        }
        a = xtime(a);
        b >>= 1;
    }
    product
}

const fn mul_table(multiplier: u8) -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = gf_mul_generic(multiplier, i as u8);
        i += 1;
    }
    table
}

/// Products `9 · x` for every byte `x`.
pub static MUL_9: [u8; 256] = mul_table(9);
/// Products `11 · x` for every byte `x`.
pub static MUL_11: [u8; 256] = mul_table(11);
/// Products `13 · x` for every byte `x`.
pub static MUL_13: [u8; 256] = mul_table(13);
/// Products `14 · x` for every byte `x`.
pub static MUL_14: [u8; 256] = mul_table(14);

/// Multiplies `multiplicand` by one of the MDS coefficients {1, 2, 3, 9, 11, 13, 14}.
///
/// Any other multiplier is outside the contract and yields zero.
#[inline]
pub fn gf_mul(multiplier: u8, multiplicand: u8) -> u8 {
    match multiplier {
        1 => multiplicand,
        2 => xtime(multiplicand),
        3 => xtime(multiplicand) ^ multiplicand,
        9 => MUL_9[multiplicand as usize],
        11 => MUL_11[multiplicand as usize],
        13 => MUL_13[multiplicand as usize],
        14 => MUL_14[multiplicand as usize],
        _ => 0,
    }
}
