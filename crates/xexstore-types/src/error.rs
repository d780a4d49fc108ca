/// Cryptographic operation errors.
///
/// The XEX core operates on fixed-size arrays and cannot fail; these
/// variants only surface at the slice-shaped edges of the crypto crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CryptoError {
    #[error("invalid key length: expected {expected}, got {got}")]
    InvalidKeyLength { expected: usize, got: usize },
}

/// Non-volatile storage errors.
///
/// Device failures originate below the encrypted layer and are propagated
/// verbatim; the remaining variants are adapter-level preconditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NvError {
    #[error("access out of range: address {address:#010x}, length {length}")]
    OutOfRange { address: u32, length: usize },
    #[error("address arithmetic overflows the 32-bit address space")]
    AddressOverflow,
    #[error("zero-length access")]
    ZeroLength,
    #[error("device failure: code {0}")]
    Device(u32),
}
