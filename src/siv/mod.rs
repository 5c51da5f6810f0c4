//! AES-SIV deterministic authenticated encryption (RFC 5297).
//!
//! A SIV key is two AES keys of equal size back to back: the first half keys
//! S2V (CMAC), the second half keys CTR.
//!
//! # Protocol
//! - **Encrypt**: `V = S2V(AD.., P)`, `Q = V & mask`, `C = V || CTR(Q, P)`.
//! - **Decrypt**: split `V`, `P' = CTR(Q, body)`, `T = S2V(AD.., P')`, compare
//!   `T` and `V` in constant time, release `P'` only if equal.
//!
//! Each call runs `Idle -> S2VComputed -> Done` on its own stack state; a
//! [`Siv`] holds only immutable key material and can be shared across threads.
//!
//! # Security
//! - On authentication failure the output buffer is wiped before returning.
//! - All argument checks depend on public lengths and counts only.

pub mod s2v;

use alloc::vec;
use alloc::vec::Vec;
use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use crate::cmac::CmacKey;
use crate::config::SivConfig;
use crate::core::block::{Block, BLOCK_SIZE};
use crate::core::ct::ct_eq;
use crate::ctr::Ctr;
use crate::error::{Error, Result};
use crate::primitive::{AesPrimitive, BlockPrimitive, KeyedPrimitive};
use crate::secret::{burn_slice, SecretBlock};

pub use s2v::S2v;

/// Upper bound on associated-data items per call.
pub const MAX_ASSOCIATED_DATA: usize = 126;

/// Legal SIV key lengths: two AES-128, AES-192 or AES-256 keys.
pub const SIV_KEY_SIZES: [usize; 3] = [32, 48, 64];

/// Length of the synthetic IV prefix.
pub const IV_SIZE: usize = BLOCK_SIZE;

/// Derives the CTR starting counter from `V` by clearing the top bit of bytes 8 and 12.
#[inline(always)]
pub fn siv_counter(v: &Block) -> Block {
    let mut q = *v;
    q[8] &= 0x7f;
    q[12] &= 0x7f;
    q
}

/// A keyed AES-SIV instance.
pub struct Siv<C = AesPrimitive> {
    mac: CmacKey<C>,
    ctr: C,
    d0: SecretBlock,
    max_ad: usize,
}

impl<C: BlockPrimitive> core::fmt::Debug for Siv<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Siv")
            .field("mac", &self.mac)
            .field("ctr", &self.ctr.name())
            .field("max_ad", &self.max_ad)
            .finish_non_exhaustive()
    }
}

impl<C: KeyedPrimitive> Siv<C> {
    /// Binds a 32, 48 or 64-byte SIV key with the default limits.
    ///
    /// # Returns
    /// * `Err(Error::InvalidKeySize)` for any other length.
    pub fn new(key: &[u8]) -> Result<Self> {
        Self::with_config(key, &SivConfig::default())
    }

    /// Binds a SIV key with explicit limits.
    ///
    /// # Returns
    /// * `Err(Error::InvalidKeySize)` for an illegal key length.
    /// * `Err(Error::TooManyAssociatedDataItems)` if the configured ceiling exceeds 126.
    pub fn with_config(key: &[u8], config: &SivConfig) -> Result<Self> {
        if !SIV_KEY_SIZES.contains(&key.len()) {
            return Err(Error::InvalidKeySize(key.len()));
        }
        config.validate()?;
        let (k1, k2) = key.split_at(key.len() / 2);
        let mut siv = Self::from_parts(CmacKey::new(k1)?, C::new_from_slice(k2)?);
        siv.max_ad = config.max_associated_data;
        log::debug!("SIV key bound ({} bytes)", key.len());
        Ok(siv)
    }
}

impl<C: BlockPrimitive> Siv<C> {
    /// Assembles an instance from an S2V key and a CTR primitive.
    pub fn from_parts(mac: CmacKey<C>, ctr: C) -> Self {
        let d0 = SecretBlock::new(s2v::initial_vector(&mac));
        Self { mac, ctr, d0, max_ad: MAX_ASSOCIATED_DATA }
    }

    /// Computes `V = S2V(AD.., P)` without encrypting.
    ///
    /// # Returns
    /// * `Err(Error::TooManyAssociatedDataItems)` if `ad` is over the limit.
    pub fn s2v<A: AsRef<[u8]>>(&self, ad: &[A], plaintext: &[u8]) -> Result<Block> {
        s2v::s2v(&self.mac, self.d0.as_block(), self.max_ad, ad, plaintext)
    }

    /// Encrypts into `out`, which must be exactly `16 + plaintext.len()` bytes.
    ///
    /// # Returns
    /// * `Err(Error::TooManyAssociatedDataItems)` if `ad` is over the limit.
    /// * `Err(Error::InvalidBufferLength)` if `out` has the wrong length.
    pub fn encrypt_into<A: AsRef<[u8]>>(&self, plaintext: &[u8], ad: &[A], out: &mut [u8]) -> Result<()> {
        self.check_ad(ad.len())?;
        let expected = IV_SIZE + plaintext.len();
        if out.len() != expected {
            return Err(Error::InvalidBufferLength { expected, actual: out.len() });
        }

        let v = self.s2v(ad, plaintext)?;
        log::trace!("SIV encrypt: Idle -> S2VComputed");

        let (iv, body) = out.split_at_mut(IV_SIZE);
        iv.copy_from_slice(&v);
        if !plaintext.is_empty() {
            body.copy_from_slice(plaintext);
            Ctr::new(&self.ctr, &siv_counter(&v)).apply_keystream(body);
        }
        log::trace!("SIV encrypt: S2VComputed -> Done");
        Ok(())
    }

    /// Encrypts `plaintext`, returning `V || C`.
    pub fn encrypt<A: AsRef<[u8]>>(&self, plaintext: &[u8], ad: &[A]) -> Result<Vec<u8>> {
        self.check_ad(ad.len())?;
        let mut out = vec![0u8; IV_SIZE + plaintext.len()];
        self.encrypt_into(plaintext, ad, &mut out)?;
        Ok(out)
    }

    /// Decrypts into `out`, which must be exactly `ciphertext.len() - 16` bytes.
    ///
    /// # Returns
    /// * `Err(Error::InvalidBufferLength)` if `ciphertext` is shorter than 16
    ///   bytes or `out` has the wrong length.
    /// * `Err(Error::TooManyAssociatedDataItems)` if `ad` is over the limit.
    /// * `Err(Error::AuthenticationFailed)` on tag mismatch; `out` is zeroed.
    pub fn decrypt_into<A: AsRef<[u8]>>(&self, ciphertext: &[u8], ad: &[A], out: &mut [u8]) -> Result<()> {
        if ciphertext.len() < IV_SIZE {
            return Err(Error::InvalidBufferLength { expected: IV_SIZE, actual: ciphertext.len() });
        }
        self.check_ad(ad.len())?;
        let expected = ciphertext.len() - IV_SIZE;
        if out.len() != expected {
            return Err(Error::InvalidBufferLength { expected, actual: out.len() });
        }

        let (iv, body) = ciphertext.split_at(IV_SIZE);
        let mut v = [0u8; IV_SIZE];
        v.copy_from_slice(iv);

        out.copy_from_slice(body);
        Ctr::new(&self.ctr, &siv_counter(&v)).apply_keystream(out);

        let t = SecretBlock::new(self.s2v(ad, out)?);
        log::trace!("SIV decrypt: Idle -> S2VComputed");

        if !ct_eq(t.as_block(), &v) {
            burn_slice(out);
            log::warn!("SIV authentication failed");
            return Err(Error::AuthenticationFailed);
        }
        log::trace!("SIV decrypt: S2VComputed -> Done");
        Ok(())
    }

    /// Decrypts and authenticates `ciphertext`.
    ///
    /// No plaintext is returned unless the synthetic IV verifies.
    pub fn decrypt<A: AsRef<[u8]>>(&self, ciphertext: &[u8], ad: &[A]) -> Result<Vec<u8>> {
        if ciphertext.len() < IV_SIZE {
            return Err(Error::InvalidBufferLength { expected: IV_SIZE, actual: ciphertext.len() });
        }
        let mut out = Zeroizing::new(vec![0u8; ciphertext.len() - IV_SIZE]);
        self.decrypt_into(ciphertext, ad, &mut out)?;
        Ok(core::mem::take(&mut *out))
    }

    /// The configured associated-data ceiling.
    pub fn max_associated_data(&self) -> usize {
        self.max_ad
    }

    fn check_ad(&self, count: usize) -> Result<()> {
        if count > self.max_ad {
            return Err(Error::TooManyAssociatedDataItems(count));
        }
        Ok(())
    }
}

/// One-shot AES-SIV encryption over raw key bytes.
///
/// # Returns
/// * `Err(Error::InvalidKeySize)` unless `key` is 32, 48 or 64 bytes.
/// * `Err(Error::TooManyAssociatedDataItems)` if more than 126 AD items.
pub fn encrypt<A: AsRef<[u8]>>(key: &[u8], plaintext: &[u8], ad: &[A]) -> Result<Vec<u8>> {
    Siv::<AesPrimitive>::new(key)?.encrypt(plaintext, ad)
}

/// One-shot AES-SIV decryption over raw key bytes.
///
/// # Returns
/// * `Err(Error::InvalidKeySize)` unless `key` is 32, 48 or 64 bytes.
/// * `Err(Error::InvalidBufferLength)` if `ciphertext` is shorter than 16 bytes.
/// * `Err(Error::AuthenticationFailed)` if the ciphertext or AD was altered.
pub fn decrypt<A: AsRef<[u8]>>(key: &[u8], ciphertext: &[u8], ad: &[A]) -> Result<Vec<u8>> {
    Siv::<AesPrimitive>::new(key)?.decrypt(ciphertext, ad)
}

/// Draws a fresh SIV key of `len` bytes from `rng`.
///
/// # Returns
/// * `Err(Error::InvalidKeySize)` unless `len` is 32, 48 or 64.
pub fn generate_key<R: RngCore + CryptoRng>(rng: &mut R, len: usize) -> Result<Zeroizing<Vec<u8>>> {
    if !SIV_KEY_SIZES.contains(&len) {
        return Err(Error::InvalidKeySize(len));
    }
    let mut key = Zeroizing::new(vec![0u8; len]);
    rng.fill_bytes(&mut key);
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_A1: &str = "fffefdfcfbfaf9f8f7f6f5f4f3f2f1f0f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff";
    const KEY_A2: &str = "7f7e7d7c7b7a79787776757473727170404142434445464748494a4b4c4d4e4f";

    struct MockRng {
        fill_val: u8,
    }

    impl RngCore for MockRng {
        fn next_u32(&mut self) -> u32 {
            let mut b = [0u8; 4];
            self.fill_bytes(&mut b);
            u32::from_le_bytes(b)
        }
        fn next_u64(&mut self) -> u64 {
            let mut b = [0u8; 8];
            self.fill_bytes(&mut b);
            u64::from_le_bytes(b)
        }
        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for b in dest.iter_mut() {
                *b = self.fill_val;
                self.fill_val = self.fill_val.wrapping_add(1);
            }
        }
        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> core::result::Result<(), rand_core::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    impl CryptoRng for MockRng {}

    #[test]
    fn test_rfc5297_a1_deterministic() {
        let key = hex::decode(KEY_A1).unwrap();
        let ad = hex::decode("101112131415161718191a1b1c1d1e1f2021222324252627").unwrap();
        let pt = hex::decode("112233445566778899aabbccddee").unwrap();

        let ct = encrypt(&key, &pt, &[&ad]).unwrap();
        assert_eq!(hex::encode(&ct), "85632d07c6e8f37f950acd320a2ecc9340c02b9690c4dc04daef7f6afe5c");
        assert_eq!(decrypt(&key, &ct, &[&ad]).unwrap(), pt);
    }

    #[test]
    fn test_rfc5297_a2_nonce_based() {
        let key = hex::decode(KEY_A2).unwrap();
        let ad1 = hex::decode(
            "00112233445566778899aabbccddeeffdeaddadadeaddadaffeeddccbbaa99887766554433221100",
        )
        .unwrap();
        let ad2 = hex::decode("102030405060708090a0").unwrap();
        let nonce = hex::decode("09f911029d74e35bd84156c5635688c0").unwrap();
        let pt = b"this is some plaintext to encrypt using SIV-AES";
        let ad = [ad1, ad2, nonce];

        let ct = encrypt(&key, pt, &ad).unwrap();
        assert_eq!(
            hex::encode(&ct),
            "7bdb6e3b432667eb06f4d14bff2fbd0f\
             cb900f2fddbe404326601965c889bf17\
             dba77ceb094fa663b7a3f748ba8af829\
             ea64ad544a272e9c485b62a3fd5c0d"
        );
        assert_eq!(decrypt(&key, &ct, &ad).unwrap(), pt.to_vec());
    }

    #[test]
    fn test_round_trip_lengths_and_key_sizes() {
        for key_len in SIV_KEY_SIZES {
            let key: Vec<u8> = (0..key_len as u8).collect();
            let siv = Siv::<AesPrimitive>::new(&key).unwrap();
            for len in 0..=40usize {
                let pt: Vec<u8> = (0..len).map(|i| (i * 7) as u8).collect();
                let ct = siv.encrypt(&pt, &[b"hdr"]).unwrap();
                assert_eq!(ct.len(), IV_SIZE + len);
                assert_eq!(siv.decrypt(&ct, &[b"hdr"]).unwrap(), pt, "key {} len {}", key_len, len);
            }
        }
    }

    #[test]
    fn test_round_trip_ad_counts() {
        let siv = Siv::<AesPrimitive>::new(&[9u8; 32]).unwrap();
        for count in [0usize, 1, 2, 125, 126] {
            let ad: Vec<Vec<u8>> = (0..count).map(|i| vec![i as u8; i % 5]).collect();
            let ct = siv.encrypt(b"payload", &ad).unwrap();
            assert_eq!(siv.decrypt(&ct, &ad).unwrap(), b"payload".to_vec(), "count {}", count);
        }

        let ad: Vec<Vec<u8>> = vec![Vec::new(); 127];
        assert_eq!(siv.encrypt(b"payload", &ad), Err(Error::TooManyAssociatedDataItems(127)));
        assert_eq!(siv.decrypt(&[0u8; 32], &ad), Err(Error::TooManyAssociatedDataItems(127)));
    }

    #[test]
    fn test_zero_ad_vs_one_empty_ad() {
        let siv = Siv::<AesPrimitive>::new(&[3u8; 32]).unwrap();
        let none: [&[u8]; 0] = [];
        let ct_none = siv.encrypt(b"m", &none).unwrap();
        let ct_empty = siv.encrypt(b"m", &[b""]).unwrap();
        assert_ne!(ct_none, ct_empty);
        assert_eq!(siv.decrypt(&ct_empty, &none), Err(Error::AuthenticationFailed));
    }

    #[test]
    fn test_tamper_detection() {
        let siv = Siv::<AesPrimitive>::new(&hex::decode(KEY_A1).unwrap()).unwrap();
        let pt = b"attack at dawn, bring snacks";
        let ct = siv.encrypt(pt, &[b"ad-1", b"ad-2"]).unwrap();

        for i in 0..ct.len() {
            let mut bad = ct.clone();
            bad[i] ^= 0x01;
            let mut out = vec![0xAAu8; pt.len()];
            assert_eq!(
                siv.decrypt_into(&bad, &[b"ad-1", b"ad-2"], &mut out),
                Err(Error::AuthenticationFailed),
                "byte {}",
                i
            );
            assert!(out.iter().all(|&b| b == 0), "output not wiped at byte {}", i);
        }

        assert_eq!(siv.decrypt(&ct, &[b"ad-1", b"ad-3"]), Err(Error::AuthenticationFailed));
        assert_eq!(siv.decrypt(&ct, &[b"ad-2", b"ad-1"]), Err(Error::AuthenticationFailed));
        assert_eq!(siv.decrypt(&ct, &[b"ad-1"]), Err(Error::AuthenticationFailed));
    }

    #[test]
    fn test_empty_plaintext() {
        let siv = Siv::<AesPrimitive>::new(&[1u8; 48]).unwrap();
        let ct = siv.encrypt(b"", &[b"only ad"]).unwrap();
        assert_eq!(ct.len(), IV_SIZE);
        assert!(siv.decrypt(&ct, &[b"only ad"]).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_key_sizes() {
        for len in [0usize, 16, 24, 31, 33, 63, 65] {
            let key = vec![0u8; len];
            assert_eq!(encrypt(&key, b"x", &[b"a"]).unwrap_err(), Error::InvalidKeySize(len));
            assert_eq!(decrypt(&key, &[0u8; 16], &[b"a"]).unwrap_err(), Error::InvalidKeySize(len));
        }
    }

    #[test]
    fn test_buffer_lengths() {
        let siv = Siv::<AesPrimitive>::new(&[5u8; 32]).unwrap();
        let none: [&[u8]; 0] = [];

        assert_eq!(
            siv.decrypt(&[0u8; 15], &none),
            Err(Error::InvalidBufferLength { expected: 16, actual: 15 })
        );

        let mut out = [0u8; 20];
        assert_eq!(
            siv.encrypt_into(b"abc", &none, &mut out),
            Err(Error::InvalidBufferLength { expected: 19, actual: 20 })
        );

        let ct = siv.encrypt(b"abc", &none).unwrap();
        let mut small = [0u8; 2];
        assert_eq!(
            siv.decrypt_into(&ct, &none, &mut small),
            Err(Error::InvalidBufferLength { expected: 3, actual: 2 })
        );
    }

    #[test]
    fn test_into_variants_match_allocating() {
        let siv = Siv::<AesPrimitive>::new(&[8u8; 64]).unwrap();
        let pt = b"sixteen byte msg plus tail";
        let mut ct = vec![0u8; IV_SIZE + pt.len()];
        siv.encrypt_into(pt, &[b"x"], &mut ct).unwrap();
        assert_eq!(ct, siv.encrypt(pt, &[b"x"]).unwrap());

        let mut out = vec![0u8; pt.len()];
        siv.decrypt_into(&ct, &[b"x"], &mut out).unwrap();
        assert_eq!(&out[..], &pt[..]);
    }

    #[test]
    fn test_counter_mask() {
        let q = siv_counter(&[0xFF; 16]);
        assert_eq!(q[8], 0x7F);
        assert_eq!(q[12], 0x7F);
        assert_eq!(q.iter().filter(|&&b| b == 0xFF).count(), 14);
    }

    #[test]
    fn test_s2v_is_iv_prefix() {
        let siv = Siv::<AesPrimitive>::new(&[4u8; 32]).unwrap();
        let v = siv.s2v(&[b"ad"], b"message").unwrap();
        let ct = siv.encrypt(b"message", &[b"ad"]).unwrap();
        assert_eq!(&ct[..IV_SIZE], &v[..]);
    }

    #[test]
    fn test_with_config_ceiling() {
        let cfg = SivConfig { max_associated_data: 2 };
        let siv = Siv::<AesPrimitive>::with_config(&[2u8; 32], &cfg).unwrap();
        assert_eq!(siv.max_associated_data(), 2);
        assert!(siv.encrypt(b"m", &[b"a", b"b"]).is_ok());
        assert_eq!(siv.encrypt(b"m", &[b"a", b"b", b"c"]), Err(Error::TooManyAssociatedDataItems(3)));

        let bad = SivConfig { max_associated_data: 200 };
        assert!(Siv::<AesPrimitive>::with_config(&[2u8; 32], &bad).is_err());
    }

    #[test]
    fn test_generate_key() {
        let mut rng = MockRng { fill_val: 0x10 };
        let key = generate_key(&mut rng, 64).unwrap();
        assert_eq!(key.len(), 64);
        assert_eq!(key[0], 0x10);
        assert_eq!(key[63], 0x4F);

        let siv = Siv::<AesPrimitive>::new(&key).unwrap();
        let ct = siv.encrypt(b"fresh", &[b"k"]).unwrap();
        assert_eq!(siv.decrypt(&ct, &[b"k"]).unwrap(), b"fresh".to_vec());

        assert_eq!(generate_key(&mut rng, 16).unwrap_err(), Error::InvalidKeySize(16));
    }
}
