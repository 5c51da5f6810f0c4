//! Constant-time comparison for authentication tags.

use subtle::ConstantTimeEq;

/// Compares two byte strings without an early exit on the first difference.
///
/// The length check is not constant time; lengths here are always public
/// (tags are a fixed 16 bytes).
#[inline(never)]
pub fn ct_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
