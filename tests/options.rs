// Option resolution and validation.
//
// Coverage:
//   - defaults for both option structs
//   - block_size boundaries 0 / 1 / 9 / 10
//   - work_factor boundaries 0 / 1 / 250 / 251
//   - negative raw buffer lengths from untrusted input
//   - invalid options are rejected before any native state exists

use bzs::config::{
    DEFAULT_DESTINATION_BUFFER_LENGTH_FOR_COMPRESSOR, DEFAULT_DESTINATION_BUFFER_LENGTH_FOR_DECOMPRESSOR,
    DEFAULT_SOURCE_BUFFER_LENGTH_FOR_COMPRESSOR, DEFAULT_SOURCE_BUFFER_LENGTH_FOR_DECOMPRESSOR,
};
use bzs::{BzsError, Compressor, CompressorOptions, Decompressor, DecompressorOptions};

fn is_validate<T: std::fmt::Debug>(r: bzs::Result<T>) -> bool {
    matches!(r, Err(BzsError::ValidateError(_)))
}

#[test]
fn compressor_defaults() {
    let o = CompressorOptions::default();
    assert_eq!(o.block_size, 9);
    assert_eq!(o.work_factor, None);
    assert!(o.quiet);
    assert!(!o.concurrency_release);
    assert_eq!(o.resolved_source_buffer_length(), DEFAULT_SOURCE_BUFFER_LENGTH_FOR_COMPRESSOR);
    assert_eq!(o.resolved_destination_buffer_length(), DEFAULT_DESTINATION_BUFFER_LENGTH_FOR_COMPRESSOR);
    assert_eq!(o.native_work_factor(), 0);
    assert_eq!(o.verbosity(), 0);
}

#[test]
fn decompressor_defaults() {
    let o = DecompressorOptions::default();
    assert!(!o.small);
    assert!(o.quiet);
    assert_eq!(o.resolved_source_buffer_length(), DEFAULT_SOURCE_BUFFER_LENGTH_FOR_DECOMPRESSOR);
    assert_eq!(o.resolved_destination_buffer_length(), DEFAULT_DESTINATION_BUFFER_LENGTH_FOR_DECOMPRESSOR);
    assert_eq!(o.native_small(), 0);
}

#[test]
fn block_size_boundaries() {
    assert!(is_validate(CompressorOptions::builder().try_block_size(0).build()));
    assert_eq!(CompressorOptions::builder().try_block_size(1).build().unwrap().block_size, 1);
    assert_eq!(CompressorOptions::builder().try_block_size(9).build().unwrap().block_size, 9);
    assert!(is_validate(CompressorOptions::builder().try_block_size(10).build()));
    assert!(is_validate(CompressorOptions::builder().block_size(10).build()));
}

#[test]
fn work_factor_boundaries() {
    assert!(is_validate(CompressorOptions::builder().try_work_factor(0).build()));
    assert_eq!(
        CompressorOptions::builder().try_work_factor(1).build().unwrap().native_work_factor(),
        1
    );
    assert_eq!(
        CompressorOptions::builder().try_work_factor(250).build().unwrap().native_work_factor(),
        250
    );
    assert!(is_validate(CompressorOptions::builder().try_work_factor(251).build()));
}

#[test]
fn negative_buffer_lengths_rejected() {
    assert!(is_validate(CompressorOptions::builder().try_source_buffer_length(-1).build()));
    assert!(is_validate(CompressorOptions::builder().try_destination_buffer_length(-1).build()));
    assert!(is_validate(DecompressorOptions::builder().try_source_buffer_length(-1).build()));
    assert!(is_validate(DecompressorOptions::builder().try_destination_buffer_length(-5).build()));
}

#[test]
fn zero_buffer_length_means_default() {
    let o = DecompressorOptions::builder().try_destination_buffer_length(0).build().unwrap();
    assert_eq!(o.resolved_destination_buffer_length(), DEFAULT_DESTINATION_BUFFER_LENGTH_FOR_DECOMPRESSOR);
}

#[test]
fn invalid_struct_rejected_by_constructor() {
    let o = CompressorOptions { block_size: 0, ..CompressorOptions::default() };
    assert!(is_validate(Compressor::new(o)));
    let o = CompressorOptions { work_factor: Some(300), ..CompressorOptions::default() };
    assert!(is_validate(Compressor::new(o)));
}

#[test]
fn quiet_false_raises_library_verbosity() {
    let o = CompressorOptions::builder().quiet(false).build().unwrap();
    assert_eq!(o.verbosity(), 1);
    let d = DecompressorOptions::builder().quiet(false).small(true).build().unwrap();
    assert_eq!(d.verbosity(), 1);
    assert_eq!(d.native_small(), 1);
    Decompressor::new(DecompressorOptions::builder().small(true).build().unwrap()).unwrap();
}

#[test]
#[cfg(target_pointer_width = "64")]
fn oversized_buffers_fail_with_mem_error() {
    let huge = 1i64 << 50;
    let c = CompressorOptions::builder().try_destination_buffer_length(huge).build().unwrap();
    assert!(matches!(Compressor::new(c), Err(BzsError::MemError)));
    let d = DecompressorOptions::builder().try_destination_buffer_length(huge).build().unwrap();
    assert!(matches!(Decompressor::new(d), Err(BzsError::MemError)));

    let src = DecompressorOptions::builder().try_source_buffer_length(huge).build().unwrap();
    assert!(matches!(bzs::BzReader::new(&b""[..], &src), Err(BzsError::MemError)));
    let src = CompressorOptions::builder().try_source_buffer_length(huge).build().unwrap();
    let r = bzs::file::compress_io(&b"data"[..], Vec::new(), &src);
    assert!(matches!(r, Err(BzsError::MemError)));
}
