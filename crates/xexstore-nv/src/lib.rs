#![doc = "Encrypted random-access block layer over raw non-volatile storage."]

pub mod encrypted;
pub mod keys;
pub mod storage;

pub use encrypted::EncryptedStore;
pub use keys::{MasterKey, MASTER_KEY_LEN};
pub use storage::{MemStorage, NvStorage};
