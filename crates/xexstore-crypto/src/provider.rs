//! Trait seam for the 128-bit block cipher primitive.
//!
//! The XEX construction consumes the primitive as a black box; any keyed,
//! invertible 16-byte permutation can stand in for AES-128 by implementing
//! [`BlockCipher`].

/// A 128-bit block cipher.
///
/// Operations are in place and infallible: the block width is fixed by the
/// type, and a keyed permutation over it has no failure modes.
pub trait BlockCipher {
    /// Encrypt one 16-byte block in place.
    fn encrypt_block(&self, block: &mut [u8; 16]);

    /// Decrypt one 16-byte block in place.
    fn decrypt_block(&self, block: &mut [u8; 16]);
}
