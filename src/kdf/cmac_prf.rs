//! AES-CMAC-PRF-128 (RFC 4615).
//!
//! Variable-length key: a 16-byte key is used directly, any other length is
//! first compressed to `K' = AES-CMAC(0^128, key)`.

use super::Prf;
use crate::cmac::{CmacKey, MacState, TAG_SIZE};
use crate::core::block::ZERO_BLOCK;
use crate::error::Result;
use crate::primitive::{AesPrimitive, KeyedPrimitive};
use crate::secret::SecretBlock;

/// AES-CMAC used as a keyed PRF with a 16-byte output.
pub struct CmacPrf<C = AesPrimitive> {
    key: CmacKey<C>,
}

impl<C: KeyedPrimitive> CmacPrf<C> {
    /// Keys the PRF with `key` of any length, including empty.
    pub fn new(key: &[u8]) -> Result<Self> {
        if key.len() == TAG_SIZE {
            return Ok(Self { key: CmacKey::new(key)? });
        }
        let zero = CmacKey::<C>::new(&ZERO_BLOCK)?;
        let derived = SecretBlock::new(zero.mac(key));
        Ok(Self { key: CmacKey::new(derived.as_block())? })
    }
}

impl<C: KeyedPrimitive> core::fmt::Debug for CmacPrf<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CmacPrf").field("key", &self.key).finish()
    }
}

impl<C: KeyedPrimitive> Prf for CmacPrf<C> {
    fn output_size(&self) -> usize {
        TAG_SIZE
    }

    fn compute(&self, parts: &[&[u8]], out: &mut [u8]) {
        debug_assert_eq!(out.len(), TAG_SIZE);
        let mut state = MacState::new();
        for part in parts {
            self.key.absorb(&mut state, part);
        }
        let tag = SecretBlock::new(self.key.squeeze(&mut state));
        out.copy_from_slice(tag.as_block());
    }
}
