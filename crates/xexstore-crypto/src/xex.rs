//! XEX (XOR-Encrypt-XOR) tweakable block cipher.
//!
//! XEX combines the random-access ability of CTR mode with the bit-flipping
//! attack resistance of ECB mode: `C = E_k(P ^ D) ^ D`, where the mask `D`
//! is the tweak value encrypted under an independent key and then doubled
//! `seq` times in GF(2^128). With independent keys and no ciphertext
//! stealing this is the block-aligned subset of XTS-AES.
//!
//! See "Efficient Instantiations of Tweakable Blockciphers and Refinements
//! to Modes OCB and PMAC" (Rogaway, 2004).

use zeroize::Zeroize;

use xexstore_types::CryptoError;

use crate::aes::{Aes128, KEY_SIZE};
use crate::gf128;
use crate::provider::BlockCipher;

/// A tweakable block cipher over 16-byte blocks.
///
/// Holds the expanded tweak and data key schedules; a key change means
/// building a fresh instance, so a stale schedule can never be observed.
pub struct Xex<C = Aes128> {
    tweak_cipher: C,
    data_cipher: C,
}

impl Xex<Aes128> {
    /// Build an AES-128 instance from independent data and tweak keys.
    pub fn new(encrypt_key: &[u8; KEY_SIZE], tweak_key: &[u8; KEY_SIZE]) -> Self {
        Self {
            tweak_cipher: Aes128::new(tweak_key),
            data_cipher: Aes128::new(encrypt_key),
        }
    }

    /// Split a combined 256-bit key: bytes 0..16 are the data-encryption
    /// key, bytes 16..32 the tweak key.
    pub fn from_combined(key: &[u8]) -> Result<Self, CryptoError> {
        if key.len() != 2 * KEY_SIZE {
            return Err(CryptoError::InvalidKeyLength {
                expected: 2 * KEY_SIZE,
                got: key.len(),
            });
        }
        Ok(Self {
            tweak_cipher: Aes128::from_slice(&key[KEY_SIZE..])?,
            data_cipher: Aes128::from_slice(&key[..KEY_SIZE])?,
        })
    }
}

impl<C: BlockCipher> Xex<C> {
    /// Build an instance over any 128-bit block cipher.
    pub fn with_ciphers(data_cipher: C, tweak_cipher: C) -> Self {
        Self {
            tweak_cipher,
            data_cipher,
        }
    }

    /// Derive the tweak mask: encrypt `n` under the tweak key, then double
    /// `seq` times in GF(2^128).
    fn mask(&self, n: &[u8; 16], seq: u32) -> [u8; 16] {
        let mut delta = *n;
        self.tweak_cipher.encrypt_block(&mut delta);
        for _ in 0..seq {
            gf128::double(&mut delta);
        }
        delta
    }

    /// Encrypt one 16-byte block in place.
    ///
    /// `n` is the data unit number in unsigned little-endian form; `seq`
    /// selects the block within that unit. Do not use `seq = 0` on
    /// production data: it degrades the construction (section 6 of the
    /// Rogaway paper). Known-answer tests are the one place it appears.
    pub fn encrypt_block(&self, n: &[u8; 16], seq: u32, block: &mut [u8; 16]) {
        let mut delta = self.mask(n, seq);
        gf128::xor_block(block, &delta);
        self.data_cipher.encrypt_block(block);
        gf128::xor_block(block, &delta);
        delta.zeroize();
    }

    /// Decrypt one 16-byte block in place. Parameters as for
    /// [`encrypt_block`](Self::encrypt_block).
    pub fn decrypt_block(&self, n: &[u8; 16], seq: u32, block: &mut [u8; 16]) {
        let mut delta = self.mask(n, seq);
        gf128::xor_block(block, &delta);
        self.data_cipher.decrypt_block(block);
        gf128::xor_block(block, &delta);
        delta.zeroize();
    }
}
