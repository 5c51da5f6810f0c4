#![forbid(unsafe_code)]
// 16-byte block helpers.
// - Fixed-size arrays only; all loops run over BLOCK_SIZE, independent of contents.
// - `pad` implements the 10* rule shared by CMAC's final block and S2V's short-plaintext branch.

/// Cipher block size in bytes.
pub const BLOCK_SIZE: usize = 16;

/// A single cipher block.
pub type Block = [u8; BLOCK_SIZE];

/// The all-zero block.
pub const ZERO_BLOCK: Block = [0u8; BLOCK_SIZE];

/// `a ^= b` over a whole block.
#[inline(always)]
pub fn xor_block(a: &mut Block, b: &Block) {
    for (x, y) in a.iter_mut().zip(b.iter()) {
        *x ^= *y;
    }
}

/// Pads `partial` (fewer than 16 bytes) with a single `0x80` byte followed by zeros.
///
/// Callers guarantee `partial.len() < BLOCK_SIZE`; the length is public.
#[inline(always)]
pub fn pad(partial: &[u8]) -> Block {
    debug_assert!(partial.len() < BLOCK_SIZE);
    let mut out = ZERO_BLOCK;
    out[..partial.len()].copy_from_slice(partial);
    out[partial.len()] = 0x80;
    out
}

/// Increments `counter` as a 128-bit big-endian integer, wrapping at 2^128.
#[inline(always)]
pub fn increment_be(counter: &mut Block) {
    let mut carry: u16 = 1;
    for byte in counter.iter_mut().rev() {
        let sum = *byte as u16 + carry;
        *byte = sum as u8;
        carry = sum >> 8;
    }
}
