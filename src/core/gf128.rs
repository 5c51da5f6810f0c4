//! GF(2^128) doubling.
//!
//! Elements are 16-byte blocks read as big-endian polynomials, reduced by
//! x^128 + x^7 + x^2 + x + 1 (low byte 0x87). Only the two operations CMAC and
//! S2V need are provided: addition (XOR) and multiplication by x ("doubling").
//!
//! # Design Choices
//! - **Branch-Free**: the reduction is applied through a mask derived from the
//!   carried-out bit, never an `if` on secret data.
//! - **No Tables**: pure shifts, nothing indexed by secret values.
//!
//! # Usage
//! ```
//! use siv_cmac::core::gf128::Gf128;
//! let mut d = Gf128([0x80; 16]);
//! d = d.double() + Gf128([1; 16]);
//! assert_eq!(d.0[15], 0x87 ^ 0x01);
//! ```

#![forbid(unsafe_code)]

use core::ops::{Add, AddAssign};
use zeroize::Zeroize;

use super::block::{Block, BLOCK_SIZE};

/// Low byte of the reduction polynomial for 128-bit blocks.
pub const R128: u8 = 0x87;

/// A GF(2^128) element held as a big-endian block.
///
/// Used for the running S2V accumulator; callers wipe it with `zeroize()`.
#[derive(Copy, Clone, Default, PartialEq, Eq, Zeroize)]
#[repr(transparent)]
pub struct Gf128(pub Block);

impl core::fmt::Debug for Gf128 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Gf128(***)")
    }
}

impl From<Block> for Gf128 {
    #[inline(always)]
    fn from(block: Block) -> Self {
        Gf128(block)
    }
}

impl From<Gf128> for Block {
    #[inline(always)]
    fn from(x: Gf128) -> Block {
        x.0
    }
}

/// Field addition is XOR.
impl Add for Gf128 {
    type Output = Self;

    #[inline(always)]
    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl AddAssign for Gf128 {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Self) {
        for (a, b) in self.0.iter_mut().zip(rhs.0.iter()) {
            *a ^= *b;
        }
    }
}

impl Gf128 {
    /// Multiplies by x: left shift by one bit, folding the carried-out bit back
    /// in as 0x87 on the last byte.
    #[inline(always)]
    pub fn double(self) -> Self {
        Gf128(dbl(&self.0))
    }
}

/// Doubling on a raw block. See [`Gf128::double`].
#[inline(always)]
pub fn dbl(block: &Block) -> Block {
    let mut out = [0u8; BLOCK_SIZE];
    let mut carry = 0u8;
    for i in (0..BLOCK_SIZE).rev() {
        out[i] = (block[i] << 1) | carry;
        carry = block[i] >> 7;
    }
    // carry is the original MSB; mask is 0xFF or 0x00
    let mask = carry.wrapping_neg();
    out[BLOCK_SIZE - 1] ^= R128 & mask;
    out
}
