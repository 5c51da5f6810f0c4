//! Configuration for the SIV and KDF layers.
//!
//! Plain structs populated by the host application and passed to the
//! respective constructors. Nothing is read from the environment or disk.

use crate::error::{Error, Result};
use crate::siv::{MAX_ASSOCIATED_DATA, SIV_KEY_SIZES};

/// Password-stretching parameters for [`crate::kdf::derive_siv_key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfConfig {
    /// PBKDF2 iteration count. Must be at least 1.
    pub iterations: u32,

    /// Length of the derived SIV key in bytes (32, 48 or 64).
    pub output_len: usize,
}

impl Default for KdfConfig {
    fn default() -> Self {
        Self {
            iterations: 10_000,
            // AES-256-SIV.
            output_len: 64,
        }
    }
}

impl KdfConfig {
    /// Checks the parameters before any derivation work.
    ///
    /// # Returns
    /// * `Err(Error::InvalidIterationCount)` if `iterations == 0`.
    /// * `Err(Error::InvalidKeySize)` if `output_len` is not a SIV key length.
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(Error::InvalidIterationCount);
        }
        if !SIV_KEY_SIZES.contains(&self.output_len) {
            return Err(Error::InvalidKeySize(self.output_len));
        }
        Ok(())
    }
}

/// Limits applied by a [`crate::siv::Siv`] instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SivConfig {
    /// Maximum number of associated-data items per call. Capped at 126.
    pub max_associated_data: usize,
}

impl Default for SivConfig {
    fn default() -> Self {
        Self {
            max_associated_data: MAX_ASSOCIATED_DATA,
        }
    }
}

impl SivConfig {
    /// # Returns
    /// * `Err(Error::TooManyAssociatedDataItems)` if the ceiling exceeds 126.
    pub fn validate(&self) -> Result<()> {
        if self.max_associated_data > MAX_ASSOCIATED_DATA {
            return Err(Error::TooManyAssociatedDataItems(self.max_associated_data));
        }
        Ok(())
    }
}
