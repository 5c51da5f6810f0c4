//! Error taxonomy shared by every construction in the crate.
//!
//! Argument errors (`InvalidKeySize`, `InvalidBufferLength`,
//! `TooManyAssociatedDataItems`, `InvalidIterationCount`) depend only on public
//! lengths and counts, and are raised before any secret byte is touched.
//! `AuthenticationFailed` is the only error produced after cryptographic work.

use core::fmt;

/// Errors returned by CMAC, CTR, SIV and KDF operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Key length is not in the algorithm's legal set. Carries the rejected length.
    InvalidKeySize(usize),
    /// A caller-supplied buffer does not have the length the operation requires.
    InvalidBufferLength {
        /// Length the operation needed.
        expected: usize,
        /// Length that was supplied.
        actual: usize,
    },
    /// More associated-data items than S2V can encode. Carries the supplied count.
    TooManyAssociatedDataItems(usize),
    /// The synthetic IV did not verify. No plaintext is released.
    AuthenticationFailed,
    /// Operation not allowed in the engine's current state.
    InvalidState,
    /// PBKDF2 iteration count of zero.
    InvalidIterationCount,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidKeySize(len) => write!(f, "Invalid key size: {} bytes", len),
            Error::InvalidBufferLength { expected, actual } => {
                write!(f, "Invalid buffer length: expected {} bytes, got {}", expected, actual)
            }
            Error::TooManyAssociatedDataItems(n) => {
                write!(f, "Too many associated data items: {} (max {})", n, crate::siv::MAX_ASSOCIATED_DATA)
            }
            Error::AuthenticationFailed => write!(f, "Authentication failed"),
            Error::InvalidState => write!(f, "Operation not allowed in current state"),
            Error::InvalidIterationCount => write!(f, "Iteration count must be at least 1"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
