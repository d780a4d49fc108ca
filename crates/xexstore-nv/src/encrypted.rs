//! Encrypted wrapper around raw non-volatile storage.
//!
//! Translates byte-granular reads and writes at arbitrary offsets into
//! aligned 16-byte block operations on the device, encrypting every block
//! with XEX keyed by the master key and tweaked by the block's storage
//! address. The device only ever sees ciphertext.
//!
//! A write is read-modify-write per covered block: raw-read the
//! ciphertext, decrypt, overlay the caller's bytes at the intra-block
//! offset, re-encrypt, raw-write. A read stops after the decrypt-and-copy
//! step. Blocks are walked in increasing address order and any device
//! error aborts the call immediately; blocks already rewritten stay
//! rewritten.

use zeroize::Zeroize;

use xexstore_crypto::Xex;
use xexstore_types::NvError;

use crate::keys::{MasterKey, MASTER_KEY_LEN};
use crate::storage::NvStorage;

/// Storage block size in bytes; every device access is one aligned block.
const BLOCK: usize = 16;

const BLOCK_MASK: u32 = !0xF;

/// Block index within its data unit. Fixed at 1: every block already gets
/// a unique tweak value from its address, and index 0 weakens XEX.
const BLOCK_SEQ: u32 = 1;

/// Encrypted view of a raw storage device.
///
/// Owns the device and the master key; the key never escapes except
/// through [`get_key`](Self::get_key).
pub struct EncryptedStore<S> {
    raw: S,
    key: MasterKey,
}

impl<S> EncryptedStore<S> {
    /// Wrap a device. The key starts cleared ("no key installed").
    pub fn new(raw: S) -> Self {
        Self {
            raw,
            key: MasterKey::new(),
        }
    }

    /// Install the combined 256-bit key; see [`MasterKey::set`].
    pub fn set_key(&mut self, combined: &[u8; MASTER_KEY_LEN]) {
        self.key.set(combined);
    }

    /// Read the combined key back; see [`MasterKey::get`].
    pub fn get_key(&self, out: &mut [u8; MASTER_KEY_LEN]) {
        self.key.get(out);
    }

    /// Wipe the key; see [`MasterKey::clear`].
    pub fn clear_key(&mut self) {
        self.key.clear();
    }

    /// Whether a key is installed, in constant time.
    pub fn is_key_nonzero(&self) -> bool {
        self.key.is_nonzero()
    }

    /// Ciphertext-level view of the device.
    pub fn raw(&self) -> &S {
        &self.raw
    }
}

impl<S: NvStorage> EncryptedStore<S> {
    /// Encrypt `data` and write it at byte offset `address`.
    ///
    /// Partially covered blocks at either end are read-modify-written, so
    /// no byte outside `address..address + data.len()` changes. On a
    /// device error the call aborts with blocks before the failure already
    /// rewritten; nothing is retried or rolled back.
    pub fn write(&mut self, data: &[u8], address: u32) -> Result<(), NvError> {
        let (first_block, last_block) = block_span(address, data.len())?;
        let xex = Xex::new(self.key.encrypt_half(), self.key.tweak_half());

        let mut scratch = [0u8; BLOCK];
        let mut offset = (address as usize) & (BLOCK - 1);
        let mut consumed = 0usize;
        let mut block_addr = first_block;
        loop {
            self.raw.read(&mut scratch, block_addr)?;
            let n = block_tweak(block_addr);
            xex.decrypt_block(&n, BLOCK_SEQ, &mut scratch);

            let take = (BLOCK - offset).min(data.len() - consumed);
            scratch[offset..offset + take].copy_from_slice(&data[consumed..consumed + take]);
            consumed += take;
            offset = 0;

            xex.encrypt_block(&n, BLOCK_SEQ, &mut scratch);
            self.raw.write(&scratch, block_addr)?;

            if block_addr == last_block {
                break;
            }
            block_addr += BLOCK as u32;
        }
        // Holds ciphertext here; wiped anyway.
        scratch.zeroize();
        Ok(())
    }

    /// Read and decrypt `buf.len()` bytes starting at byte offset
    /// `address`.
    pub fn read(&mut self, buf: &mut [u8], address: u32) -> Result<(), NvError> {
        let (first_block, last_block) = block_span(address, buf.len())?;
        let xex = Xex::new(self.key.encrypt_half(), self.key.tweak_half());

        let mut scratch = [0u8; BLOCK];
        let mut offset = (address as usize) & (BLOCK - 1);
        let mut copied = 0usize;
        let mut block_addr = first_block;
        loop {
            if let Err(e) = self.raw.read(&mut scratch, block_addr) {
                // Earlier iterations leave plaintext in the scratch.
                scratch.zeroize();
                return Err(e);
            }
            let n = block_tweak(block_addr);
            xex.decrypt_block(&n, BLOCK_SEQ, &mut scratch);

            let take = (BLOCK - offset).min(buf.len() - copied);
            buf[copied..copied + take].copy_from_slice(&scratch[offset..offset + take]);
            copied += take;
            offset = 0;

            if block_addr == last_block {
                break;
            }
            block_addr += BLOCK as u32;
        }
        scratch.zeroize();
        Ok(())
    }

    /// Force buffered device writes out; forwarded verbatim.
    pub fn flush(&mut self) -> Result<(), NvError> {
        self.raw.flush()
    }
}

/// Starting addresses of the first and last 16-byte blocks covered by
/// `address..address + length`.
///
/// Zero-length accesses are rejected, as is any range whose last byte
/// falls outside the 32-bit address space.
fn block_span(address: u32, length: usize) -> Result<(u32, u32), NvError> {
    if length == 0 {
        return Err(NvError::ZeroLength);
    }
    let length = u32::try_from(length).map_err(|_| NvError::AddressOverflow)?;
    let last = address
        .checked_add(length - 1)
        .ok_or(NvError::AddressOverflow)?;
    Ok((address & BLOCK_MASK, last & BLOCK_MASK))
}

/// Tweak value for a block: its starting byte address, little-endian, in
/// the low four bytes of the 128-bit data unit number.
fn block_tweak(block_addr: u32) -> [u8; 16] {
    let mut n = [0u8; 16];
    n[..4].copy_from_slice(&block_addr.to_le_bytes());
    n
}
