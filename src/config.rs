// Compile-time configuration constants.
//
// Buffer defaults are mirrored between compressor and decompressor.
// A `0` buffer length in the options resolves to these values.

pub const KB: usize = 1 << 10;

// Default source staging length for the compressor (256 KiB).
pub const DEFAULT_SOURCE_BUFFER_LENGTH_FOR_COMPRESSOR: usize = 256 * KB;

// Default destination length for the compressor (64 KiB).
pub const DEFAULT_DESTINATION_BUFFER_LENGTH_FOR_COMPRESSOR: usize = 64 * KB;

// Default source staging length for the decompressor (64 KiB).
pub const DEFAULT_SOURCE_BUFFER_LENGTH_FOR_DECOMPRESSOR: usize = 64 * KB;

// Default destination length for the decompressor (256 KiB).
pub const DEFAULT_DESTINATION_BUFFER_LENGTH_FOR_DECOMPRESSOR: usize = 256 * KB;

// Absolute floor for any destination buffer, and the smallest growth step.
// Also the smallest buffer length the test-suite drives the engine with.
pub const MIN_BUFFER_LENGTH: usize = 512;

// Block size in units of 100 kB, as accepted by BZ2_bzCompressInit.
pub const MIN_BLOCK_SIZE: u32 = 1;
pub const MAX_BLOCK_SIZE: u32 = 9;
pub const DEFAULT_BLOCK_SIZE: u32 = 9;

// Work factor bounds. The library treats 0 as "use default (30)", which is
// what an unset work factor resolves to.
pub const MIN_WORK_FACTOR: u32 = 1;
pub const MAX_WORK_FACTOR: u32 = 250;
pub const LIBRARY_DEFAULT_WORK_FACTOR: u32 = 0;

// libbz2 verbosity used when `quiet` is disabled. 0 is silent; the library
// accepts up to 4.
pub const NOISY_VERBOSITY: i32 = 1;

// Default number of CLI worker threads (0 = one per core).
// Can be overridden with -T#.
pub const NB_WORKERS_DEFAULT: usize = 0;

// Maximum number of CLI worker threads selectable at runtime.
pub const NB_WORKERS_MAX: usize = 200;

// Environment variable read by the CLI to override the default block size.
pub const ENV_CLEVEL: &str = "BZS_CLEVEL";

// Suffix appended by the CLI to compressed files.
pub const BZ2_EXTENSION: &str = ".bz2";
