//! Master key state for the encrypted storage layer.
//!
//! The 256-bit master key lives only in volatile memory and is split into
//! two independent 128-bit halves: one for the data encryption pass and
//! one for deriving the tweak mask. The all-zero state means "no key
//! installed" and is what higher layers test for.

use core::sync::atomic::{compiler_fence, Ordering};

use subtle::ConstantTimeEq;
use zeroize::Zeroize;

/// Length of the combined master key blob in bytes.
pub const MASTER_KEY_LEN: usize = 32;

const HALF: usize = MASTER_KEY_LEN / 2;

/// The combined master key, held as its two independent halves.
///
/// Created in the cleared (all-zero) state; both halves are wiped on drop.
pub struct MasterKey {
    encrypt_key: [u8; HALF],
    tweak_key: [u8; HALF],
}

impl MasterKey {
    /// A key in the cleared state.
    pub fn new() -> Self {
        Self {
            encrypt_key: [0u8; HALF],
            tweak_key: [0u8; HALF],
        }
    }

    /// Install a combined key: bytes 0..16 become the data-encryption
    /// half, bytes 16..32 the tweak half. The two must be independent.
    pub fn set(&mut self, combined: &[u8; MASTER_KEY_LEN]) {
        self.encrypt_key.copy_from_slice(&combined[..HALF]);
        self.tweak_key.copy_from_slice(&combined[HALF..]);
    }

    /// Read the combined key back; inverse of [`set`](Self::set).
    pub fn get(&self, out: &mut [u8; MASTER_KEY_LEN]) {
        out[..HALF].copy_from_slice(&self.encrypt_key);
        out[HALF..].copy_from_slice(&self.tweak_key);
    }

    /// Whether any byte of either half is nonzero.
    ///
    /// Constant-time in the key: all 32 bytes are OR-accumulated and a
    /// single comparison happens at the end.
    pub fn is_nonzero(&self) -> bool {
        let mut acc = 0u8;
        for b in self.encrypt_key.iter().chain(self.tweak_key.iter()) {
            acc |= b;
        }
        acc.ct_eq(&0).unwrap_u8() == 0
    }

    /// Wipe both halves: one pass of 0xFF, then one pass of 0x00.
    ///
    /// Both passes are volatile writes behind a compiler fence, so neither
    /// can be elided from the emitted code. Idempotent.
    pub fn clear(&mut self) {
        wipe(&mut self.encrypt_key);
        wipe(&mut self.tweak_key);
    }

    pub(crate) fn encrypt_half(&self) -> &[u8; HALF] {
        &self.encrypt_key
    }

    pub(crate) fn tweak_half(&self) -> &[u8; HALF] {
        &self.tweak_key
    }
}

impl Default for MasterKey {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MasterKey {
    fn drop(&mut self) {
        self.clear();
    }
}

fn wipe(half: &mut [u8; HALF]) {
    for b in half.iter_mut() {
        // SAFETY: `b` is a valid, exclusive reference to an initialized byte.
        unsafe { core::ptr::write_volatile(b, 0xFF) };
    }
    compiler_fence(Ordering::SeqCst);
    half.zeroize();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_cleared() {
        let key = MasterKey::new();
        assert!(!key.is_nonzero());

        let mut out = [0xAAu8; MASTER_KEY_LEN];
        key.get(&mut out);
        assert_eq!(out, [0u8; MASTER_KEY_LEN]);
    }

    #[test]
    fn set_get_roundtrip() {
        let mut combined = [0u8; MASTER_KEY_LEN];
        for (i, b) in combined.iter_mut().enumerate() {
            *b = i as u8;
        }

        let mut key = MasterKey::new();
        key.set(&combined);

        let mut out = [0u8; MASTER_KEY_LEN];
        key.get(&mut out);
        assert_eq!(out, combined);
    }

    /// A single nonzero byte anywhere in either half flips the test.
    #[test]
    fn is_nonzero_sees_every_byte() {
        for i in 0..MASTER_KEY_LEN {
            let mut combined = [0u8; MASTER_KEY_LEN];
            combined[i] = 0x01;
            let mut key = MasterKey::new();
            key.set(&combined);
            assert!(key.is_nonzero(), "byte {i} not seen");
        }
    }

    #[test]
    fn nonzero_tweak_half_alone_is_detected() {
        // Blob with byte 16 set: encrypt half all zero, tweak half nonzero.
        let mut combined = [0u8; MASTER_KEY_LEN];
        combined[16] = 0x01;
        let mut key = MasterKey::new();
        key.set(&combined);
        assert!(key.is_nonzero());
    }

    #[test]
    fn clear_is_idempotent() {
        let mut key = MasterKey::new();
        key.set(&[0x77u8; MASTER_KEY_LEN]);
        assert!(key.is_nonzero());

        key.clear();
        assert!(!key.is_nonzero());
        let mut once = [0u8; MASTER_KEY_LEN];
        key.get(&mut once);

        key.clear();
        assert!(!key.is_nonzero());
        let mut twice = [0u8; MASTER_KEY_LEN];
        key.get(&mut twice);

        assert_eq!(once, twice);
        assert_eq!(once, [0u8; MASTER_KEY_LEN]);
    }

    #[test]
    fn halves_split_at_byte_16() {
        let mut combined = [0u8; MASTER_KEY_LEN];
        combined[..16].copy_from_slice(&[0x11; 16]);
        combined[16..].copy_from_slice(&[0x22; 16]);

        let mut key = MasterKey::new();
        key.set(&combined);
        assert_eq!(key.encrypt_half(), &[0x11; 16]);
        assert_eq!(key.tweak_half(), &[0x22; 16]);
    }
}
