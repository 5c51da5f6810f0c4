//! Password-based key derivation.
//!
//! # Components
//! - `Prf`: the keyed function PBKDF2 iterates.
//! - `cmac_prf`: AES-CMAC-PRF-128 (RFC 4615), the default PRF.
//! - `pbkdf2`: RFC 8018 §5.2 over any `Prf`.
//! - `derive_siv_key`: password + salt to a ready-to-use SIV key.
//!
//! # Security
//! - Every `U_j` and `T_i` intermediate lives in a `Zeroizing` buffer.
//! - Parameters are validated before the first PRF call.

pub mod cmac_prf;

pub use cmac_prf::CmacPrf;

use alloc::vec;
use alloc::vec::Vec;
use zeroize::Zeroizing;

use crate::config::KdfConfig;
use crate::core::xor::xor_in_place;
use crate::error::{Error, Result};
use crate::primitive::AesPrimitive;

/// A pseudorandom function keyed at construction, with a fixed output size.
pub trait Prf {
    /// Output length in bytes (`hLen`).
    fn output_size(&self) -> usize;

    /// Writes `PRF(parts[0] || parts[1] || ..)` into `out`.
    ///
    /// `out.len()` must equal [`Prf::output_size`].
    fn compute(&self, parts: &[&[u8]], out: &mut [u8]);
}

/// PBKDF2: fills `out` from `prf` (keyed with the password), `salt` and `iterations`.
///
/// # Returns
/// * `Err(Error::InvalidIterationCount)` if `iterations == 0`.
/// * `Err(Error::InvalidBufferLength)` if `out` is empty or longer than
///   `(2^32 - 1) * hLen`.
pub fn pbkdf2<P: Prf + ?Sized>(prf: &P, salt: &[u8], iterations: u32, out: &mut [u8]) -> Result<()> {
    if iterations == 0 {
        return Err(Error::InvalidIterationCount);
    }
    let h_len = prf.output_size();
    if out.is_empty() {
        return Err(Error::InvalidBufferLength { expected: h_len, actual: 0 });
    }
    let blocks = (out.len() + h_len - 1) / h_len;
    if blocks as u64 > u32::MAX as u64 {
        return Err(Error::InvalidBufferLength { expected: h_len.saturating_mul(u32::MAX as usize), actual: out.len() });
    }

    let mut u = Zeroizing::new(vec![0u8; h_len]);
    let mut next = Zeroizing::new(vec![0u8; h_len]);
    let mut t = Zeroizing::new(vec![0u8; h_len]);

    for (i, chunk) in out.chunks_mut(h_len).enumerate() {
        let index = (i as u32 + 1).to_be_bytes();
        prf.compute(&[salt, &index[..]], &mut u);
        t.copy_from_slice(&u);

        for _ in 1..iterations {
            prf.compute(&[&u[..]], &mut next);
            core::mem::swap(&mut *u, &mut *next);
            xor_in_place(&mut t, &u);
        }
        chunk.copy_from_slice(&t[..chunk.len()]);
    }
    Ok(())
}

/// Stretches `password` into a SIV key using PBKDF2 with AES-CMAC-PRF-128.
///
/// # Returns
/// * `Err(Error::InvalidIterationCount)` / `Err(Error::InvalidKeySize)` if
///   `config` fails validation.
pub fn derive_siv_key(password: &[u8], salt: &[u8], config: &KdfConfig) -> Result<Zeroizing<Vec<u8>>> {
    config.validate()?;
    let prf = CmacPrf::<AesPrimitive>::new(password)?;
    let mut key = Zeroizing::new(vec![0u8; config.output_len]);
    pbkdf2(&prf, salt, config.iterations, &mut key)?;
    log::debug!("derived {}-byte SIV key ({} iterations)", config.output_len, config.iterations);
    Ok(key)
}
