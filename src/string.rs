//! Whole-buffer compression and decompression.
//!
//! Both functions own a codec instance for the duration of the call and
//! always close it, on success and on error.

use crate::error::Result;
use crate::option::{CompressorOptions, DecompressorOptions};
use crate::stream::{Compressor, Decompressor};

/// Compresses `src` into one complete bzip2 stream.
pub fn compress(src: &[u8], options: &CompressorOptions) -> Result<Vec<u8>> {
    let mut compressor = Compressor::new(*options)?;
    let result = compress_with(&mut compressor, src);
    compressor.close()?;
    result
}

fn compress_with(compressor: &mut Compressor, src: &[u8]) -> Result<Vec<u8>> {
    let mut out = compressor.write(src)?;
    out.extend_from_slice(&compressor.finish()?);
    Ok(out)
}

/// Decompresses `src`, which may hold several concatenated bzip2 streams.
///
/// Fails with [`UnexpectedEof`](crate::error::BzsError::UnexpectedEof) when the last stream is incomplete
/// and with a data error when bytes after a stream are not another stream.
/// Empty input decodes to empty output.
pub fn decompress(src: &[u8], options: &DecompressorOptions) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut pending = src.to_vec();
    while !pending.is_empty() {
        let mut decompressor = Decompressor::new(*options)?;
        let result = decompress_one(&mut decompressor, &pending, &mut out);
        let trailing = decompressor.take_trailing_input();
        decompressor.close()?;
        result?;
        pending = trailing;
    }
    Ok(out)
}

fn decompress_one(decompressor: &mut Decompressor, src: &[u8], out: &mut Vec<u8>) -> Result<()> {
    out.extend_from_slice(&decompressor.read(src)?);
    decompressor.finish_input()
}

/// Decompresses exactly one stream and returns it with the unread remainder.
pub fn decompress_single(src: &[u8], options: &DecompressorOptions) -> Result<(Vec<u8>, Vec<u8>)> {
    let mut decompressor = Decompressor::new(*options)?;
    let mut out = Vec::new();
    let result = decompress_one(&mut decompressor, src, &mut out);
    let trailing = decompressor.take_trailing_input();
    decompressor.close()?;
    result.map(|()| (out, trailing))
}

/// `true` if `src` starts with a bzip2 stream header (`BZh1`..`BZh9`).
pub fn looks_like_bzip2(src: &[u8]) -> bool {
    matches!(src, [b'B', b'Z', b'h', level, ..] if (b'1'..=b'9').contains(level))
}
