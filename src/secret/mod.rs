//! Secret buffer handling.
//!
//! Every chaining value, keystream block and subkey in this crate lives in a
//! type that zeroes itself on drop, so the wipe happens on every exit path:
//! normal return, `?` early return and unwinding alike.
//!
//! # Components
//! - `SecretBlock`: a 16-byte block wiped on drop.
//! - `with_secret`: scoped scratch block for short-lived intermediates.
//! - `burn`: explicit wiping of caller-owned slices.

pub mod burn;

pub use burn::burn_slice;

use core::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::core::block::Block;

/// A 16-byte secret value, zeroed on drop.
#[derive(Clone, Default, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecretBlock(Block);

impl SecretBlock {
    /// Takes ownership of `block`. The caller's copy is not wiped.
    pub fn new(block: Block) -> Self {
        Self(block)
    }

    /// Returns a reference to the block bytes.
    pub fn as_block(&self) -> &Block {
        &self.0
    }

    /// Returns a mutable reference to the block bytes.
    pub fn as_block_mut(&mut self) -> &mut Block {
        &mut self.0
    }
}

impl fmt::Debug for SecretBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretBlock(***SENSITIVE***)")
    }
}

/// Runs `f` with a zeroed scratch block that is wiped when `f` returns or unwinds.
#[inline(always)]
pub fn with_secret<R>(f: impl FnOnce(&mut Block) -> R) -> R {
    let mut scratch = SecretBlock::default();
    f(scratch.as_block_mut())
}
