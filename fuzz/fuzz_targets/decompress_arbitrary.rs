#![no_main]
use libfuzzer_sys::fuzz_target;

use bzs::{BzsError, DecompressorOptions};

fuzz_target!(|data: &[u8]| {
    // Arbitrary input may fail, but only with a decode error, never a panic
    // or an engine-internal error.
    let opts = DecompressorOptions::builder()
        .destination_buffer_length(512)
        .small(data.len() % 2 == 1)
        .build()
        .unwrap();
    match bzs::decompress(data, &opts) {
        Ok(_) => {}
        Err(e) if e.is_corruption() => {}
        Err(BzsError::MemError) => {}
        Err(e) => panic!("unexpected error kind on arbitrary input: {e:?}"),
    }
});
