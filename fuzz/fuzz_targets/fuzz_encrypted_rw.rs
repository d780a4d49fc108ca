#![no_main]
use libfuzzer_sys::fuzz_target;
use xexstore_nv::{EncryptedStore, MemStorage};

const SIZE: usize = 1024;

// Interpret the input as a stream of read/write operations against a
// plaintext mirror; every read must agree with the mirror.
fuzz_target!(|data: &[u8]| {
    let mut store = EncryptedStore::new(MemStorage::new(SIZE));
    store.set_key(&[0xA5; 32]);
    let mut mirror = [0u8; SIZE];

    let mut input = data;
    while input.len() >= 4 {
        let op = input[0];
        let address = u16::from_le_bytes([input[1], input[2]]) as usize % SIZE;
        let length = 1 + input[3] as usize % (SIZE - address);
        input = &input[4..];

        if op & 1 == 0 {
            let take = length.min(input.len());
            if take == 0 {
                break;
            }
            store.write(&input[..take], address as u32).unwrap();
            mirror[address..address + take].copy_from_slice(&input[..take]);
            input = &input[take..];
        } else {
            let mut buf = [0u8; 256];
            store.read(&mut buf[..length], address as u32).unwrap();
            assert_eq!(&buf[..length], &mirror[address..address + length]);
        }
    }
});
