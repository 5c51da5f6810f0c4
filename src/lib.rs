#![cfg_attr(not(feature = "std"), no_std)]
//! AES-CMAC and AES-SIV.
//!
//! - `cmac`: NIST SP 800-38B message authentication, one-shot and incremental.
//! - `siv`: RFC 5297 deterministic authenticated encryption (S2V + CTR).
//! - `ctr`: counter-mode keystream transform used by SIV.
//! - `kdf`: PBKDF2 over a pluggable PRF, with AES-CMAC-PRF-128 (RFC 4615).
//!
//! The AES permutation itself is supplied through [`primitive::BlockPrimitive`];
//! the default adapter wraps the RustCrypto `aes` crate.
//!
//! # Example
//! ```
//! let key = [0x42u8; 32];
//! let ct = siv_cmac::siv::encrypt(&key, b"hello", &[b"header"]).unwrap();
//! let pt = siv_cmac::siv::decrypt(&key, &ct, &[b"header"]).unwrap();
//! assert_eq!(pt, b"hello");
//! ```

extern crate alloc;

pub mod core;
pub mod primitive;
pub mod secret;
pub mod cmac;
pub mod ctr;
pub mod siv;
pub mod kdf;
pub mod config;
pub mod error;

pub use error::{Error, Result};
pub use crate::core::block::{Block, BLOCK_SIZE};
pub use cmac::Cmac;
pub use siv::Siv;
