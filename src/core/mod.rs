//! Bit-level building blocks shared by CMAC, S2V and CTR.
//!
//! - `block`: the 16-byte block type, 10* padding and big-endian increment.
//! - `gf128`: doubling in GF(2^128) with the 0x87 reduction constant.
//! - `xor`: word-wise XOR of a keystream into a buffer.
//! - `ct`: constant-time equality for tags.

pub mod block;
pub mod ct;
pub mod gf128;
pub mod xor;
