#![forbid(unsafe_code)]
// Constant-time XOR of a keystream into a buffer.
// - Processes 8-byte words, then a byte tail.
// - No secret-dependent branching; lengths are checked by callers.
// - Used by `ctr` for the keystream application and by S2V's xorend step.

/// XORs `keystream` into `data` in place.
/// Requires: `keystream.len() >= data.len()`.
#[inline(always)]
pub fn xor_in_place(data: &mut [u8], keystream: &[u8]) {
    debug_assert!(keystream.len() >= data.len());
    let len = data.len();
    let mut i = 0;

    while i + 16 <= len {
        let mut a0 = [0u8; 8];
        let mut a1 = [0u8; 8];
        let mut b0 = [0u8; 8];
        let mut b1 = [0u8; 8];
        a0.copy_from_slice(&data[i..i + 8]);
        a1.copy_from_slice(&data[i + 8..i + 16]);
        b0.copy_from_slice(&keystream[i..i + 8]);
        b1.copy_from_slice(&keystream[i + 8..i + 16]);
        let x0 = u64::from_ne_bytes(a0) ^ u64::from_ne_bytes(b0);
        let x1 = u64::from_ne_bytes(a1) ^ u64::from_ne_bytes(b1);
        data[i..i + 8].copy_from_slice(&x0.to_ne_bytes());
        data[i + 8..i + 16].copy_from_slice(&x1.to_ne_bytes());
        i += 16;
    }

    while i + 8 <= len {
        let mut a = [0u8; 8];
        let mut b = [0u8; 8];
        a.copy_from_slice(&data[i..i + 8]);
        b.copy_from_slice(&keystream[i..i + 8]);
        let x = u64::from_ne_bytes(a) ^ u64::from_ne_bytes(b);
        data[i..i + 8].copy_from_slice(&x.to_ne_bytes());
        i += 8;
    }

    while i < len {
        data[i] ^= keystream[i];
        i += 1;
    }
}
