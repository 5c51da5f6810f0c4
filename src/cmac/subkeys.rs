//! CMAC subkey derivation (SP 800-38B §6.1).
//!
//! L = CIPH_K(0^128), K1 = dbl(L), K2 = dbl(K1). Derived once per key and kept
//! alongside it; a new key means a new `Subkeys`.

use core::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::core::block::{Block, ZERO_BLOCK};
use crate::core::gf128::dbl;
use crate::primitive::BlockPrimitive;
use crate::secret::SecretBlock;

/// The K1/K2 pair masking the final CMAC block.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Subkeys {
    k1: Block,
    k2: Block,
}

impl fmt::Debug for Subkeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subkeys")
            .field("k1", &"***SENSITIVE***")
            .field("k2", &"***SENSITIVE***")
            .finish()
    }
}

impl Subkeys {
    /// Derives K1 and K2 with one block encryption and two doublings.
    pub fn derive<C: BlockPrimitive + ?Sized>(cipher: &C) -> Self {
        let mut l = SecretBlock::new(ZERO_BLOCK);
        cipher.encrypt_block(l.as_block_mut());
        let k1 = dbl(l.as_block());
        let k2 = dbl(&k1);
        Self { k1, k2 }
    }

    /// Mask for a final block that is exactly 16 bytes.
    pub fn k1(&self) -> &Block {
        &self.k1
    }

    /// Mask for a padded final block.
    pub fn k2(&self) -> &Block {
        &self.k2
    }
}
