//! CMAC chaining state.
//!
//! # States
//! - **Empty**: nothing absorbed since creation or the last reset.
//! - **Accumulating**: at least one byte absorbed. The last (up to 16) bytes
//!   are held back in `buffer` until it is known whether they are final.
//! - **Finalized**: tag produced; further input is rejected until `reset`.
//!
//! A full buffer is only folded into the chain when more input arrives, so the
//! K1/K2 final-block transform is never applied to a block that is not last.

use zeroize::{Zeroize, ZeroizeOnDrop};

use super::subkeys::Subkeys;
use crate::core::block::{pad, xor_block, Block, BLOCK_SIZE, ZERO_BLOCK};
use crate::error::{Error, Result};
use crate::primitive::BlockPrimitive;
use crate::secret::SecretBlock;

/// Lifecycle of a [`MacState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Initial state, no input absorbed.
    Empty,
    /// Input absorbed, tag not yet produced.
    Accumulating,
    /// Tag produced.
    Finalized,
}

/// Running CBC-MAC accumulator for a single message.
///
/// Holds no key material; the cipher and subkeys are passed in on each call so
/// a single key can drive any number of independent states.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct MacState {
    chain: Block,
    buffer: Block,
    buffered: usize,
    #[zeroize(skip)]
    phase: Phase,
}

impl core::fmt::Debug for MacState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MacState")
            .field("buffered", &self.buffered)
            .field("phase", &self.phase)
            .finish()
    }
}

impl Default for MacState {
    fn default() -> Self {
        Self::new()
    }
}

impl MacState {
    /// A fresh state: `C = 0^128`, empty buffer.
    pub fn new() -> Self {
        Self {
            chain: ZERO_BLOCK,
            buffer: ZERO_BLOCK,
            buffered: 0,
            phase: Phase::Empty,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Wipes the chain and buffer and returns to `Empty`.
    pub fn reset(&mut self) {
        self.chain.zeroize();
        self.buffer.zeroize();
        self.buffered = 0;
        self.phase = Phase::Empty;
    }

    /// Absorbs `data`.
    ///
    /// # Returns
    /// * `Err(Error::InvalidState)` if the state is `Finalized`.
    pub fn update<C: BlockPrimitive + ?Sized>(&mut self, cipher: &C, data: &[u8]) -> Result<()> {
        if self.phase == Phase::Finalized {
            log::warn!("CMAC update rejected: state already finalized");
            return Err(Error::InvalidState);
        }
        self.absorb(cipher, data);
        Ok(())
    }

    /// Applies the final-block transform and returns the tag.
    ///
    /// # Returns
    /// * `Err(Error::InvalidState)` if the state is already `Finalized`.
    pub fn finalize<C: BlockPrimitive + ?Sized>(&mut self, cipher: &C, subkeys: &Subkeys) -> Result<Block> {
        if self.phase == Phase::Finalized {
            log::warn!("CMAC finalize rejected: state already finalized");
            return Err(Error::InvalidState);
        }
        Ok(self.squeeze(cipher, subkeys))
    }

    /// Unchecked absorb; callers own the phase check.
    pub(crate) fn absorb<C: BlockPrimitive + ?Sized>(&mut self, cipher: &C, data: &[u8]) {
        if data.is_empty() {
            return;
        }
        self.phase = Phase::Accumulating;

        let mut i = 0;
        while i < data.len() {
            if self.buffered == BLOCK_SIZE {
                // More input follows, so the held block is not final.
                self.fold(cipher);
            }
            let take = (BLOCK_SIZE - self.buffered).min(data.len() - i);
            self.buffer[self.buffered..self.buffered + take].copy_from_slice(&data[i..i + take]);
            self.buffered += take;
            i += take;
        }
    }

    /// Unchecked finalize; callers own the phase check.
    pub(crate) fn squeeze<C: BlockPrimitive + ?Sized>(&mut self, cipher: &C, subkeys: &Subkeys) -> Block {
        let last = if self.buffered == BLOCK_SIZE {
            let mut b = SecretBlock::new(self.buffer);
            xor_block(b.as_block_mut(), subkeys.k1());
            b
        } else {
            let mut b = SecretBlock::new(pad(&self.buffer[..self.buffered]));
            xor_block(b.as_block_mut(), subkeys.k2());
            b
        };
        xor_block(&mut self.chain, last.as_block());
        cipher.encrypt_block(&mut self.chain);
        let tag = self.chain;

        self.chain.zeroize();
        self.buffer.zeroize();
        self.buffered = 0;
        self.phase = Phase::Finalized;
        tag
    }

    fn fold<C: BlockPrimitive + ?Sized>(&mut self, cipher: &C) {
        xor_block(&mut self.chain, &self.buffer);
        cipher.encrypt_block(&mut self.chain);
        self.buffer.zeroize();
        self.buffered = 0;
    }
}
