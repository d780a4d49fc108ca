#![doc = "Cryptographic core for the xexstore encrypted storage layer."]

// Core traits
pub mod provider;

// Block cipher primitive
pub mod aes;

// Tweak schedule arithmetic
pub mod gf128;

// Tweakable cipher construction
pub mod xex;

pub use aes::{Aes128, BLOCK_SIZE};
pub use provider::BlockCipher;
pub use xex::Xex;
