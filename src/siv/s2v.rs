//! S2V: folding a vector of strings into one block (RFC 5297 §2.4).
//!
//! ```text
//! D = CMAC(0^128)
//! for each S_i:   D = dbl(D) xor CMAC(S_i)
//! |P| >= 16:      V = CMAC(P[..n-16] || (P[n-16..] xor D))
//! |P| <  16:      V = CMAC(dbl(D) xor pad(P))
//! ```

use zeroize::Zeroize;

use crate::cmac::{CmacKey, MacState};
use crate::core::block::{pad, xor_block, Block, BLOCK_SIZE, ZERO_BLOCK};
use crate::core::gf128::Gf128;
use crate::error::{Error, Result};
use crate::primitive::{AesPrimitive, BlockPrimitive};
use crate::secret::SecretBlock;

/// `CMAC(0^128)`, the starting accumulator for a key.
pub fn initial_vector<C: BlockPrimitive>(mac: &CmacKey<C>) -> Block {
    mac.mac(&ZERO_BLOCK)
}

/// A running S2V accumulator for one call.
///
/// Borrows the CMAC key; owns `D`, which is wiped on drop.
pub struct S2v<'k, C: BlockPrimitive = AesPrimitive> {
    mac: &'k CmacKey<C>,
    d: Gf128,
    items: usize,
    max_items: usize,
}

impl<'k, C: BlockPrimitive> core::fmt::Debug for S2v<'k, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("S2v")
            .field("d", &self.d)
            .field("items", &self.items)
            .finish_non_exhaustive()
    }
}

impl<'k, C: BlockPrimitive> Drop for S2v<'k, C> {
    fn drop(&mut self) {
        self.d.zeroize();
    }
}

impl<'k, C: BlockPrimitive> S2v<'k, C> {
    /// Starts from a cached `D = CMAC(0^128)`, accepting at most `max_items`
    /// associated-data strings.
    pub fn new(mac: &'k CmacKey<C>, d0: &Block, max_items: usize) -> Self {
        Self { mac, d: Gf128(*d0), items: 0, max_items }
    }

    /// Folds one associated-data string into `D`.
    ///
    /// # Returns
    /// * `Err(Error::TooManyAssociatedDataItems)` once `max_items` have been pushed.
    pub fn push(&mut self, item: &[u8]) -> Result<()> {
        if self.items >= self.max_items {
            return Err(Error::TooManyAssociatedDataItems(self.items + 1));
        }
        let tag = SecretBlock::new(self.mac.mac(item));
        self.d = self.d.double() + Gf128(*tag.as_block());
        self.items += 1;
        Ok(())
    }

    /// Number of strings folded so far.
    pub fn items(&self) -> usize {
        self.items
    }

    /// Folds in the plaintext and returns `V`.
    pub fn finish(self, plaintext: &[u8]) -> Block {
        let mut state = MacState::new();

        if plaintext.len() >= BLOCK_SIZE {
            // xorend: D goes into the last 16 bytes only.
            let split = plaintext.len() - BLOCK_SIZE;
            let mut last = SecretBlock::default();
            last.as_block_mut().copy_from_slice(&plaintext[split..]);
            xor_block(last.as_block_mut(), &self.d.0);

            self.mac.absorb(&mut state, &plaintext[..split]);
            self.mac.absorb(&mut state, last.as_block());
        } else {
            let mut t = self.d.double() + Gf128(pad(plaintext));
            self.mac.absorb(&mut state, &t.0);
            t.zeroize();
        }

        self.mac.squeeze(&mut state)
    }
}

/// S2V over a full associated-data list and plaintext.
///
/// # Returns
/// * `Err(Error::TooManyAssociatedDataItems)` if `ad.len() > max_items`;
///   checked before any CMAC is computed.
pub fn s2v<C, A>(mac: &CmacKey<C>, d0: &Block, max_items: usize, ad: &[A], plaintext: &[u8]) -> Result<Block>
where
    C: BlockPrimitive,
    A: AsRef<[u8]>,
{
    if ad.len() > max_items {
        return Err(Error::TooManyAssociatedDataItems(ad.len()));
    }
    let mut acc = S2v::new(mac, d0, max_items);
    for item in ad {
        acc.push(item.as_ref())?;
    }
    Ok(acc.finish(plaintext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::siv::MAX_ASSOCIATED_DATA;

    fn key_a1() -> CmacKey<AesPrimitive> {
        CmacKey::new(&hex::decode("fffefdfcfbfaf9f8f7f6f5f4f3f2f1f0").unwrap()).unwrap()
    }

    #[test]
    fn test_rfc5297_a1_vector() {
        let mac = key_a1();
        let d0 = initial_vector(&mac);
        let ad = hex::decode("101112131415161718191a1b1c1d1e1f2021222324252627").unwrap();
        let p = hex::decode("112233445566778899aabbccddee").unwrap();
        let v = s2v(&mac, &d0, MAX_ASSOCIATED_DATA, &[ad], &p).unwrap();
        assert_eq!(hex::encode(v), "85632d07c6e8f37f950acd320a2ecc93");
    }

    #[test]
    fn test_zero_items_differs_from_one_empty_item() {
        let mac = key_a1();
        let d0 = initial_vector(&mac);
        let none: [&[u8]; 0] = [];
        let one_empty: [&[u8]; 1] = [b""];
        for p in [&b""[..], b"short", b"exactly sixteen!", b"more than sixteen bytes"] {
            let a = s2v(&mac, &d0, MAX_ASSOCIATED_DATA, &none, p).unwrap();
            let b = s2v(&mac, &d0, MAX_ASSOCIATED_DATA, &one_empty, p).unwrap();
            assert_ne!(a, b);
        }
    }

    #[test]
    fn test_item_order_matters() {
        let mac = key_a1();
        let d0 = initial_vector(&mac);
        let ab = s2v(&mac, &d0, MAX_ASSOCIATED_DATA, &[b"a", b"b"], b"p").unwrap();
        let ba = s2v(&mac, &d0, MAX_ASSOCIATED_DATA, &[b"b", b"a"], b"p").unwrap();
        assert_ne!(ab, ba);
    }

    #[test]
    fn test_short_branch_matches_definition() {
        let mac = key_a1();
        let d0 = initial_vector(&mac);
        let p = b"fifteen bytes!!";
        let v = s2v::<_, &[u8]>(&mac, &d0, MAX_ASSOCIATED_DATA, &[], p).unwrap();

        let mut t = Gf128(d0).double().0;
        xor_block(&mut t, &pad(p));
        assert_eq!(v, mac.mac(&t));
    }

    #[test]
    fn test_long_branch_matches_definition() {
        let mac = key_a1();
        let d0 = initial_vector(&mac);
        let p = b"twenty bytes of data";
        let v = s2v::<_, &[u8]>(&mac, &d0, MAX_ASSOCIATED_DATA, &[], p).unwrap();

        let mut m = p.to_vec();
        let n = m.len();
        for (x, y) in m[n - 16..].iter_mut().zip(d0.iter()) {
            *x ^= *y;
        }
        assert_eq!(v, mac.mac(&m));
    }

    #[test]
    fn test_item_limit() {
        let mac = key_a1();
        let d0 = initial_vector(&mac);
        let items = alloc::vec![[0u8; 1]; MAX_ASSOCIATED_DATA + 1];
        assert!(s2v(&mac, &d0, MAX_ASSOCIATED_DATA, &items[..MAX_ASSOCIATED_DATA], b"").is_ok());
        assert_eq!(
            s2v(&mac, &d0, MAX_ASSOCIATED_DATA, &items[..], b""),
            Err(Error::TooManyAssociatedDataItems(MAX_ASSOCIATED_DATA + 1))
        );

        let mut acc = S2v::new(&mac, &d0, 2);
        acc.push(b"1").unwrap();
        acc.push(b"2").unwrap();
        assert_eq!(acc.push(b"3"), Err(Error::TooManyAssociatedDataItems(3)));
        assert_eq!(acc.items(), 2);
    }
}
