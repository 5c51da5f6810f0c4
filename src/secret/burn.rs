//! Wiping of caller-visible buffers.
//!
//! Used wherever a buffer that may hold unauthenticated plaintext or key
//! material is handed back to the caller, e.g. the output slice of a failed
//! `decrypt_into`.
//!
//! # Security
//! - **Zeroize**: the final pass goes through `zeroize`, which the compiler may not elide.
//! - **Paranoid Mode**: with the `paranoid` feature, two extra pattern passes
//!   (0xFF, then an index pattern) run before the zero pass.

use zeroize::Zeroize;

/// Overwrites `slice` with zeros.
#[inline(never)]
pub fn burn_slice(slice: &mut [u8]) {
    #[cfg(feature = "paranoid")]
    {
        for byte in slice.iter_mut() {
            *byte = 0xFF;
        }
        core::sync::atomic::compiler_fence(core::sync::atomic::Ordering::SeqCst);
        for (i, byte) in slice.iter_mut().enumerate() {
            *byte = (i % 255) as u8;
        }
        core::sync::atomic::compiler_fence(core::sync::atomic::Ordering::SeqCst);
    }

    slice.zeroize();
    core::sync::atomic::compiler_fence(core::sync::atomic::Ordering::SeqCst);
}
