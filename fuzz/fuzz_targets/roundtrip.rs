#![no_main]
use libfuzzer_sys::fuzz_target;

use bzs::{Compressor, CompressorOptions, Decompressor, DecompressorOptions};

fuzz_target!(|data: &[u8]| {
    // First byte picks the block size and the write chunk length.
    let (block_size, chunk) = match data.first() {
        Some(&b) => (u32::from(b % 9) + 1, usize::from(b) + 1),
        None => (9, 1),
    };
    let opts = CompressorOptions::builder()
        .block_size(block_size)
        .destination_buffer_length(512)
        .build()
        .unwrap();

    let mut compressor = Compressor::new(opts).unwrap();
    let mut packed = Vec::new();
    for piece in data.chunks(chunk) {
        packed.extend(compressor.write(piece).unwrap());
    }
    packed.extend(compressor.finish().unwrap());
    compressor.close().unwrap();

    let mut decompressor = Decompressor::new(DecompressorOptions::default()).unwrap();
    let mut recovered = Vec::new();
    for piece in packed.chunks(chunk) {
        recovered.extend(decompressor.read(piece).unwrap());
    }
    decompressor.finish_input().unwrap();
    assert!(decompressor.trailing_input().is_empty());

    assert_eq!(
        recovered, data,
        "round-trip mismatch: {} bytes in, {} bytes back",
        data.len(),
        recovered.len()
    );
});
