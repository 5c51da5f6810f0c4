//! AES-CMAC (NIST SP 800-38B, RFC 4493).
//!
//! # Components
//! - `subkeys`: K1/K2 derivation.
//! - `engine`: the per-message chaining state machine.
//!
//! # Shapes
//! - [`CmacKey`]: cipher + cached subkeys. Immutable after construction and
//!   usable from many threads at once; each call builds its own state.
//! - [`Cmac`]: an owned incremental engine (`update` / `finalize`) bound to one key.
//! - [`compute_tag`] / [`verify_tag`]: one-shot helpers over raw key bytes.

pub mod engine;
pub mod subkeys;

pub use engine::{MacState, Phase};
pub use subkeys::Subkeys;

use crate::core::block::Block;
use crate::core::ct::ct_eq;
use crate::error::{Error, Result};
use crate::primitive::{is_aes_key_size, AesPrimitive, BlockPrimitive, KeyedPrimitive};

/// Tag length in bytes.
pub const TAG_SIZE: usize = 16;

/// A CMAC key: the block primitive plus its derived subkeys.
pub struct CmacKey<C = AesPrimitive> {
    cipher: C,
    subkeys: Subkeys,
}

impl<C: BlockPrimitive> core::fmt::Debug for CmacKey<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CmacKey")
            .field("cipher", &self.cipher.name())
            .field("subkeys", &self.subkeys)
            .finish()
    }
}

impl<C: KeyedPrimitive> CmacKey<C> {
    /// Binds a 16, 24 or 32-byte AES key.
    ///
    /// # Returns
    /// * `Err(Error::InvalidKeySize)` for any other length.
    pub fn new(key: &[u8]) -> Result<Self> {
        if !is_aes_key_size(key.len()) {
            return Err(Error::InvalidKeySize(key.len()));
        }
        Ok(Self::from_primitive(C::new_from_slice(key)?))
    }
}

impl<C: BlockPrimitive> CmacKey<C> {
    /// Wraps an already keyed primitive and derives its subkeys.
    pub fn from_primitive(cipher: C) -> Self {
        let subkeys = Subkeys::derive(&cipher);
        log::debug!("CMAC key bound ({})", cipher.name());
        Self { cipher, subkeys }
    }

    /// One-shot tag over `message`.
    pub fn mac(&self, message: &[u8]) -> Block {
        let mut state = MacState::new();
        self.absorb(&mut state, message);
        self.squeeze(&mut state)
    }

    /// Checks `tag` against the tag of `message` in constant time.
    ///
    /// # Returns
    /// * `Err(Error::InvalidBufferLength)` if `tag` is not 16 bytes.
    /// * `Err(Error::AuthenticationFailed)` on mismatch.
    pub fn verify(&self, message: &[u8], tag: &[u8]) -> Result<()> {
        if tag.len() != TAG_SIZE {
            return Err(Error::InvalidBufferLength { expected: TAG_SIZE, actual: tag.len() });
        }
        let computed = self.mac(message);
        if ct_eq(&computed, tag) {
            Ok(())
        } else {
            log::warn!("CMAC verification failed");
            Err(Error::AuthenticationFailed)
        }
    }

    /// Absorbs into a caller-owned state.
    ///
    /// # Returns
    /// * `Err(Error::InvalidState)` if `state` is finalized.
    pub fn update(&self, state: &mut MacState, data: &[u8]) -> Result<()> {
        state.update(&self.cipher, data)
    }

    /// Finalizes a caller-owned state.
    ///
    /// # Returns
    /// * `Err(Error::InvalidState)` if `state` is already finalized.
    pub fn finalize(&self, state: &mut MacState) -> Result<Block> {
        state.finalize(&self.cipher, &self.subkeys)
    }

    /// The underlying block primitive.
    pub fn primitive(&self) -> &C {
        &self.cipher
    }

    pub(crate) fn absorb(&self, state: &mut MacState, data: &[u8]) {
        state.absorb(&self.cipher, data);
    }

    pub(crate) fn squeeze(&self, state: &mut MacState) -> Block {
        state.squeeze(&self.cipher, &self.subkeys)
    }
}

/// Incremental CMAC engine owning its key and one chaining state.
///
/// `update` may be called any number of times with arbitrary chunk sizes; the
/// result equals the one-shot tag over the concatenated input.
pub struct Cmac<C = AesPrimitive> {
    key: CmacKey<C>,
    state: MacState,
}

impl<C: BlockPrimitive> core::fmt::Debug for Cmac<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Cmac").field("key", &self.key).field("state", &self.state).finish()
    }
}

impl<C: KeyedPrimitive> Cmac<C> {
    /// Creates an engine in the `Empty` state.
    ///
    /// # Returns
    /// * `Err(Error::InvalidKeySize)` unless `key` is 16, 24 or 32 bytes.
    pub fn new(key: &[u8]) -> Result<Self> {
        Ok(Self::from_key(CmacKey::new(key)?))
    }

    /// Replaces the key, recomputing the subkeys and resetting the state.
    ///
    /// # Returns
    /// * `Err(Error::InvalidState)` while a message is being accumulated.
    /// * `Err(Error::InvalidKeySize)` for an illegal key length; the old key stays bound.
    pub fn set_key(&mut self, key: &[u8]) -> Result<()> {
        if self.state.phase() == Phase::Accumulating {
            log::warn!("CMAC rekey rejected: message in progress");
            return Err(Error::InvalidState);
        }
        self.key = CmacKey::new(key)?;
        self.state.reset();
        Ok(())
    }
}

impl<C: BlockPrimitive> Cmac<C> {
    /// Wraps an existing key.
    pub fn from_key(key: CmacKey<C>) -> Self {
        Self { key, state: MacState::new() }
    }

    /// Current phase of the chaining state.
    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// Absorbs `data`.
    ///
    /// # Returns
    /// * `Err(Error::InvalidState)` after `finalize` until `reset`.
    pub fn update(&mut self, data: &[u8]) -> Result<()> {
        self.key.update(&mut self.state, data)
    }

    /// Produces the tag and moves to `Finalized`.
    ///
    /// # Returns
    /// * `Err(Error::InvalidState)` if already finalized.
    pub fn finalize(&mut self) -> Result<Block> {
        self.key.finalize(&mut self.state)
    }

    /// Produces the tag and immediately resets for the next message.
    pub fn finalize_reset(&mut self) -> Result<Block> {
        let tag = self.finalize()?;
        self.reset();
        Ok(tag)
    }

    /// Discards any partial message and returns to `Empty`.
    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// The bound key.
    pub fn key(&self) -> &CmacKey<C> {
        &self.key
    }
}

/// One-shot AES-CMAC over raw key bytes.
///
/// # Returns
/// * `Err(Error::InvalidKeySize)` unless `key` is 16, 24 or 32 bytes.
pub fn compute_tag(key: &[u8], message: &[u8]) -> Result<Block> {
    Ok(CmacKey::<AesPrimitive>::new(key)?.mac(message))
}

/// One-shot constant-time verification over raw key bytes.
///
/// # Returns
/// * `Err(Error::InvalidKeySize)` unless `key` is 16, 24 or 32 bytes.
/// * `Err(Error::InvalidBufferLength)` if `tag` is not 16 bytes.
/// * `Err(Error::AuthenticationFailed)` on mismatch.
pub fn verify_tag(key: &[u8], message: &[u8], tag: &[u8]) -> Result<()> {
    CmacKey::<AesPrimitive>::new(key)?.verify(message, tag)
}
