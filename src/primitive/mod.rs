//! The block-cipher seam.
//!
//! CMAC, CTR and SIV only ever need the forward direction of AES on a single
//! 16-byte block. That operation is abstracted here so any conforming AES
//! implementation (software, hardware-backed, FFI) can be substituted without
//! touching the modes built on top of it.
//!
//! # Components
//! - `aes`: the default implementation over the RustCrypto `aes` crate.

pub mod aes;

pub use self::aes::AesPrimitive;

use crate::core::block::Block;
use crate::error::Result;

/// Legal raw AES key lengths in bytes.
pub const AES_KEY_SIZES: [usize; 3] = [16, 24, 32];

/// Returns `true` if `len` is a legal raw AES key length.
#[inline(always)]
pub fn is_aes_key_size(len: usize) -> bool {
    AES_KEY_SIZES.contains(&len)
}

/// Single-block forward permutation under a fixed key (`CIPH_K`).
pub trait BlockPrimitive {
    /// Returns a short identifier for the primitive, for logging.
    fn name(&self) -> &'static str;

    /// Encrypts `block` in place.
    fn encrypt_block(&self, block: &mut Block);
}

/// A [`BlockPrimitive`] that can be constructed from raw key bytes.
pub trait KeyedPrimitive: BlockPrimitive + Sized {
    /// Builds the primitive from `key`.
    ///
    /// # Returns
    /// * `Err(Error::InvalidKeySize)` if the implementation does not accept `key.len()`.
    fn new_from_slice(key: &[u8]) -> Result<Self>;
}
