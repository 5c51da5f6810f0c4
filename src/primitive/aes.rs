//! [`BlockPrimitive`] over RustCrypto's `aes`.
#![forbid(unsafe_code)]

use aes::cipher::{generic_array::GenericArray, BlockEncrypt as _, KeyInit as _};
use aes::{Aes128, Aes192, Aes256};

use super::{BlockPrimitive, KeyedPrimitive};
use crate::core::block::Block;
use crate::error::{Error, Result};

/// AES with the key size picked from the key length (16, 24 or 32 bytes).
///
/// The wrapped key schedules are wiped on drop by the `aes` crate's
/// `zeroize` feature.
pub enum AesPrimitive {
    Aes128(Aes128),
    Aes192(Aes192),
    Aes256(Aes256),
}

impl core::fmt::Debug for AesPrimitive {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("AesPrimitive").field(&self.name()).finish()
    }
}

impl KeyedPrimitive for AesPrimitive {
    fn new_from_slice(key: &[u8]) -> Result<Self> {
        let invalid = |_| Error::InvalidKeySize(key.len());
        match key.len() {
            16 => Aes128::new_from_slice(key).map(AesPrimitive::Aes128).map_err(invalid),
            24 => Aes192::new_from_slice(key).map(AesPrimitive::Aes192).map_err(invalid),
            32 => Aes256::new_from_slice(key).map(AesPrimitive::Aes256).map_err(invalid),
            n => Err(Error::InvalidKeySize(n)),
        }
    }
}

impl BlockPrimitive for AesPrimitive {
    fn name(&self) -> &'static str {
        match self {
            AesPrimitive::Aes128(_) => "AES-128",
            AesPrimitive::Aes192(_) => "AES-192",
            AesPrimitive::Aes256(_) => "AES-256",
        }
    }

    #[inline(always)]
    fn encrypt_block(&self, block: &mut Block) {
        let b = GenericArray::from_mut_slice(block.as_mut_slice());
        match self {
            AesPrimitive::Aes128(c) => c.encrypt_block(b),
            AesPrimitive::Aes192(c) => c.encrypt_block(b),
            AesPrimitive::Aes256(c) => c.encrypt_block(b),
        }
    }
}
