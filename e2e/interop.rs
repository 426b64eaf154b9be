// Wire compatibility with the `bzip2` crate.
//
// Our streams must decode with an independent implementation, and theirs
// with ours, across block sizes, concatenation and empty input.

use std::io::{Read, Write};

use bzip2::read::{BzDecoder, MultiBzDecoder};
use bzip2::write::BzEncoder;
use bzip2::Compression;
use bzs::{BzReader, BzWriter, CompressorOptions, DecompressorOptions};

fn corpus() -> Vec<u8> {
    let mut out = Vec::new();
    for i in 0..40_000u32 {
        out.extend_from_slice(format!("{i:05} line of interop text\n").as_bytes());
        if i % 97 == 0 {
            out.extend_from_slice(&i.to_le_bytes());
        }
    }
    out
}

fn reference_compress(data: &[u8], level: u32) -> Vec<u8> {
    let mut enc = BzEncoder::new(Vec::new(), Compression::new(level));
    enc.write_all(data).unwrap();
    enc.finish().unwrap()
}

#[test]
fn reference_decodes_our_output() {
    let data = corpus();
    for block_size in [1u32, 5, 9] {
        let opts = CompressorOptions::builder().block_size(block_size).build().unwrap();
        let packed = bzs::compress(&data, &opts).unwrap();
        assert_eq!(packed[3], b'0' + block_size as u8);

        let mut back = Vec::new();
        BzDecoder::new(&packed[..]).read_to_end(&mut back).unwrap();
        assert_eq!(back, data, "block size {block_size}");
    }
}

#[test]
fn we_decode_reference_output() {
    let data = corpus();
    for level in [1u32, 6, 9] {
        let packed = reference_compress(&data, level);
        let back = bzs::decompress(&packed, &DecompressorOptions::default()).unwrap();
        assert_eq!(back, data, "level {level}");
    }
}

#[test]
fn empty_streams_interoperate() {
    let ours = bzs::compress(b"", &CompressorOptions::default()).unwrap();
    let mut back = Vec::new();
    BzDecoder::new(&ours[..]).read_to_end(&mut back).unwrap();
    assert!(back.is_empty());

    let theirs = reference_compress(b"", 9);
    assert!(bzs::decompress(&theirs, &DecompressorOptions::default()).unwrap().is_empty());
}

#[test]
fn flushed_writer_output_decodes_with_reference() {
    let data = corpus();
    let mut w = BzWriter::new(Vec::new(), &CompressorOptions::default()).unwrap();
    for piece in data.chunks(100_000) {
        w.write_all(piece).unwrap();
        w.flush().unwrap();
    }
    let packed = w.finish().unwrap();

    let mut back = Vec::new();
    BzDecoder::new(&packed[..]).read_to_end(&mut back).unwrap();
    assert_eq!(back, data);
}

#[test]
fn concatenated_streams_both_ways() {
    let mut mixed = bzs::compress(b"ours first, ", &CompressorOptions::default()).unwrap();
    mixed.extend(reference_compress(b"theirs second", 3));

    let mut via_reference = Vec::new();
    MultiBzDecoder::new(&mixed[..]).read_to_end(&mut via_reference).unwrap();
    assert_eq!(via_reference, b"ours first, theirs second");

    let mut via_ours = Vec::new();
    BzReader::new(&mixed[..], &DecompressorOptions::default())
        .unwrap()
        .read_to_end(&mut via_ours)
        .unwrap();
    assert_eq!(via_ours, b"ours first, theirs second");
}
