//! AES-CTR keystream transform (SP 800-38A §6.5).
//!
//! The counter is a full 128-bit big-endian integer incremented by one per
//! block, wrapping modulo 2^128. Encryption and decryption are the same
//! operation.

use alloc::vec::Vec;

use crate::core::block::{increment_be, Block, BLOCK_SIZE};
use crate::core::xor::xor_in_place;
use crate::error::Result;
use crate::primitive::{AesPrimitive, BlockPrimitive, KeyedPrimitive};
use crate::secret::SecretBlock;

/// Streaming CTR transform over a borrowed block primitive.
///
/// Successive calls to [`Ctr::apply_keystream`] continue the keystream, so the
/// output does not depend on how the input is chunked.
pub struct Ctr<'c, C: BlockPrimitive + ?Sized = AesPrimitive> {
    cipher: &'c C,
    counter: SecretBlock,
    keystream: SecretBlock,
    // Bytes of `keystream` already consumed; BLOCK_SIZE means "refill".
    pos: usize,
}

impl<'c, C: BlockPrimitive + ?Sized> core::fmt::Debug for Ctr<'c, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Ctr")
            .field("cipher", &self.cipher.name())
            .field("pos", &self.pos)
            .finish_non_exhaustive()
    }
}

impl<'c, C: BlockPrimitive + ?Sized> Ctr<'c, C> {
    /// Starts a keystream at `counter`.
    pub fn new(cipher: &'c C, counter: &Block) -> Self {
        Self {
            cipher,
            counter: SecretBlock::new(*counter),
            keystream: SecretBlock::default(),
            pos: BLOCK_SIZE,
        }
    }

    /// XORs the next `data.len()` keystream bytes into `data`.
    pub fn apply_keystream(&mut self, data: &mut [u8]) {
        let mut i = 0;
        while i < data.len() {
            if self.pos == BLOCK_SIZE {
                self.refill();
            }
            let take = (BLOCK_SIZE - self.pos).min(data.len() - i);
            xor_in_place(
                &mut data[i..i + take],
                &self.keystream.as_block()[self.pos..self.pos + take],
            );
            self.pos += take;
            i += take;
        }
    }

    fn refill(&mut self) {
        let ks = self.keystream.as_block_mut();
        ks.copy_from_slice(self.counter.as_block());
        self.cipher.encrypt_block(ks);
        increment_be(self.counter.as_block_mut());
        self.pos = 0;
    }
}

/// One-shot in-place CTR over a borrowed primitive.
pub fn apply_keystream<C: BlockPrimitive + ?Sized>(cipher: &C, counter: &Block, data: &mut [u8]) {
    Ctr::new(cipher, counter).apply_keystream(data);
}

/// AES-CTR over raw key bytes, returning a fresh buffer.
///
/// # Returns
/// * `Err(Error::InvalidKeySize)` unless `key` is 16, 24 or 32 bytes.
pub fn transform(key: &[u8], counter: &Block, data: &[u8]) -> Result<Vec<u8>> {
    let cipher = AesPrimitive::new_from_slice(key)?;
    let mut out = data.to_vec();
    apply_keystream(&cipher, counter, &mut out);
    Ok(out)
}
