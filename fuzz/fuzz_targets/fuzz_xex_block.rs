#![no_main]
use libfuzzer_sys::fuzz_target;
use xexstore_crypto::Xex;

// 32-byte combined key, 16-byte unit number, 1-byte seq, 16-byte block.
fuzz_target!(|data: &[u8]| {
    if data.len() < 65 {
        return;
    }
    let Ok(xex) = Xex::from_combined(&data[..32]) else {
        return;
    };
    let n: [u8; 16] = data[32..48].try_into().unwrap();
    let seq = u32::from(data[48]) + 1;
    let plain: [u8; 16] = data[49..65].try_into().unwrap();

    let mut block = plain;
    xex.encrypt_block(&n, seq, &mut block);
    xex.decrypt_block(&n, seq, &mut block);
    assert_eq!(block, plain);
});
