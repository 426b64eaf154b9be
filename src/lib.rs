//! Streaming bzip2 compression and decompression over libbz2.
//!
//! The core is a pair of stateful engines, [`Compressor`] and
//! [`Decompressor`], that accept input in arbitrary chunks and return
//! whatever output the library produced for it. [`file`] wraps them as
//! `std::io::Write` / `std::io::Read` adaptors and [`string`] offers
//! one-shot helpers.
//!
//! ```no_run
//! use bzs::{compress, decompress, CompressorOptions, DecompressorOptions};
//!
//! let packed = compress(b"hello hello hello", &CompressorOptions::default())?;
//! let plain = decompress(&packed, &DecompressorOptions::default())?;
//! assert_eq!(plain, b"hello hello hello");
//! # Ok::<(), bzs::BzsError>(())
//! ```

pub mod buffer;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod file;
pub mod gate;
pub mod native;
pub mod option;
pub mod stream;
pub mod string;
pub mod threadpool;
pub mod util;

pub const BZS_VERSION_MAJOR: u32 = 1;
pub const BZS_VERSION_MINOR: u32 = 3;
pub const BZS_VERSION_RELEASE: u32 = 0;
pub const BZS_VERSION_NUMBER: u32 =
    BZS_VERSION_MAJOR * 100 * 100 + BZS_VERSION_MINOR * 100 + BZS_VERSION_RELEASE;
pub const BZS_VERSION_STRING: &str = env!("CARGO_PKG_VERSION");

pub fn version_number() -> u32 {
    BZS_VERSION_NUMBER
}

pub fn version_string() -> &'static str {
    BZS_VERSION_STRING
}

pub use error::{BzsError, Result};
pub use file::{BzReader, BzWriter};
pub use native::library_version;
pub use option::{CompressorOptions, CompressorOptionsBuilder, DecompressorOptions, DecompressorOptionsBuilder};
pub use stream::{Compressor, CompressorState, Decompressor, DecompressorState};
pub use string::{compress, decompress};
