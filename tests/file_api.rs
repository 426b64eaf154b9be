// Read / Write adaptors and the reader → writer helpers.
//
// Coverage:
//   - BzWriter → BzReader round trip with small and default buffers
//   - Drop finalises a BzWriter
//   - BzReader across concatenated streams, and single_stream mode
//   - errors surface through io::Error and come back via BzsError::from_io
//   - compress_file / decompress_file on real paths
//   - test_io counts decoded bytes and flags corruption

use std::fs;
use std::io::{Cursor, Read, Write};

use bzs::file::{compress_file, compress_io, decompress_file, decompress_io, test_io};
use bzs::{BzReader, BzWriter, BzsError, CompressorOptions, DecompressorOptions};
use tempfile::TempDir;

fn text(len: usize) -> Vec<u8> {
    b"Lorem ipsum dolor sit amet, consectetur adipiscing elit. "
        .iter()
        .cycle()
        .take(len)
        .copied()
        .collect()
}

fn pack(data: &[u8]) -> Vec<u8> {
    bzs::compress(data, &CompressorOptions::default()).unwrap()
}

#[test]
fn writer_reader_round_trip() {
    let data = text(300_000);
    let copts = CompressorOptions::builder()
        .source_buffer_length(1024)
        .destination_buffer_length(512)
        .build()
        .unwrap();
    let mut w = BzWriter::new(Vec::new(), &copts).unwrap();
    for piece in data.chunks(777) {
        w.write_all(piece).unwrap();
    }
    let packed = w.finish().unwrap();

    let dopts = copts.compatible_decompressor_options();
    let mut r = BzReader::new(Cursor::new(packed), &dopts).unwrap();
    let mut back = Vec::new();
    r.read_to_end(&mut back).unwrap();
    assert_eq!(back, data);
}

#[test]
fn dropped_writer_still_writes_trailer() {
    let mut sink = Vec::new();
    {
        let mut w = BzWriter::new(&mut sink, &CompressorOptions::default()).unwrap();
        w.write_all(b"dropped, not finished").unwrap();
    }
    assert_eq!(
        bzs::decompress(&sink, &DecompressorOptions::default()).unwrap(),
        b"dropped, not finished"
    );
}

#[test]
fn reader_follows_concatenated_streams() {
    let mut joined = pack(b"alpha ");
    joined.extend(pack(b"beta "));
    joined.extend(pack(b""));
    joined.extend(pack(b"gamma"));

    let mut out = String::new();
    BzReader::new(Cursor::new(joined.clone()), &DecompressorOptions::default())
        .unwrap()
        .read_to_string(&mut out)
        .unwrap();
    assert_eq!(out, "alpha beta gamma");

    let mut first = Vec::new();
    let mut r = BzReader::new(Cursor::new(joined), &DecompressorOptions::default())
        .unwrap()
        .single_stream();
    r.read_to_end(&mut first).unwrap();
    assert_eq!(first, b"alpha ");
    assert!(r.trailing_input().starts_with(b"BZh9"));
}

#[test]
fn truncated_input_reports_unexpected_eof() {
    let packed = pack(&text(10_000));
    let mut r = BzReader::new(Cursor::new(&packed[..packed.len() / 2]), &DecompressorOptions::default())
        .unwrap();
    let err = r.read_to_end(&mut Vec::new()).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    assert!(matches!(BzsError::from_io(err), BzsError::UnexpectedEof));
}

#[test]
fn io_helpers_report_totals() {
    let data = text(50_000);
    let mut packed = Vec::new();
    let (read, written) = compress_io(&data[..], &mut packed, &CompressorOptions::default()).unwrap();
    assert_eq!(read, data.len() as u64);
    assert_eq!(written, packed.len() as u64);

    let mut back = Vec::new();
    let (read, written) = decompress_io(&packed[..], &mut back, &DecompressorOptions::default()).unwrap();
    assert_eq!(read, packed.len() as u64);
    assert_eq!(written, data.len() as u64);
    assert_eq!(back, data);

    assert_eq!(test_io(&packed[..], &DecompressorOptions::default()).unwrap(), data.len() as u64);
}

#[test]
fn test_io_flags_bad_magic() {
    let err = test_io(&b"not bzip2 at all"[..], &DecompressorOptions::default()).unwrap_err();
    assert!(matches!(err, BzsError::DataErrorMagic));
    assert!(err.is_corruption());
}

#[test]
fn file_helpers_round_trip() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("in.txt");
    let packed = dir.path().join("in.txt.bz2");
    let back = dir.path().join("back.txt");
    fs::write(&src, text(20_000)).unwrap();

    let opts = CompressorOptions::builder().block_size(1).build().unwrap();
    compress_file(&src, &packed, &opts).unwrap();
    assert!(bzs::string::looks_like_bzip2(&fs::read(&packed).unwrap()));
    decompress_file(&packed, &back, &DecompressorOptions::default()).unwrap();
    assert_eq!(fs::read(&back).unwrap(), fs::read(&src).unwrap());
}

#[test]
fn missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = compress_file(
        &dir.path().join("missing"),
        &dir.path().join("out.bz2"),
        &CompressorOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, BzsError::Io(_)));
}
