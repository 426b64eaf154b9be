//! Raw streaming codec engine.
//!
//! [`Compressor`] and [`Decompressor`] drive one libbz2 stream each across
//! repeated calls: every call feeds the whole caller slice to the native step
//! in a loop, grows the destination buffer on demand, and returns the bytes
//! produced by that call. Nothing is retained from the caller's input between
//! calls except the decompressor's trailing input after end-of-stream.

pub mod compressor;
pub mod decompressor;
pub mod types;

pub use compressor::Compressor;
pub use decompressor::Decompressor;
pub use types::{CompressorState, DecompressorState};
