//! Option resolution for compressors and decompressors.
//!
//! Options are plain value types built once, validated in `build()`, and then
//! handed to [`crate::stream::Compressor::new`] /
//! [`crate::stream::Decompressor::new`]. Nothing here allocates native
//! resources, so an invalid configuration is rejected before any handle
//! exists.
//!
//! Raw integers coming from untrusted sources (CLI flags, environment,
//! foreign callers) go through the `try_*` setters, which reject negative or
//! out-of-range values with [`BzsError::ValidateError`].

use crate::config::{
    DEFAULT_BLOCK_SIZE, DEFAULT_DESTINATION_BUFFER_LENGTH_FOR_COMPRESSOR,
    DEFAULT_DESTINATION_BUFFER_LENGTH_FOR_DECOMPRESSOR, DEFAULT_SOURCE_BUFFER_LENGTH_FOR_COMPRESSOR,
    DEFAULT_SOURCE_BUFFER_LENGTH_FOR_DECOMPRESSOR, LIBRARY_DEFAULT_WORK_FACTOR, MAX_BLOCK_SIZE,
    MAX_WORK_FACTOR, MIN_BLOCK_SIZE, MIN_WORK_FACTOR, NOISY_VERBOSITY,
};
use crate::error::{BzsError, Result};

// ─────────────────────────────────────────────────────────────────────────────
// Shared validation helpers
// ─────────────────────────────────────────────────────────────────────────────

fn validate_not_negative(name: &str, value: i64) -> Result<usize> {
    if value < 0 {
        return Err(BzsError::validate(format!("{name} must not be negative, got {value}")));
    }
    usize::try_from(value)
        .map_err(|_| BzsError::validate(format!("{name} {value} does not fit in memory")))
}

fn validate_range(name: &str, value: i64, min: u32, max: u32) -> Result<u32> {
    if value < i64::from(min) || value > i64::from(max) {
        return Err(BzsError::validate(format!(
            "{name} must be in {min}..={max}, got {value}"
        )));
    }
    Ok(value as u32)
}

#[inline]
fn verbosity_for(quiet: bool) -> i32 {
    if quiet {
        0
    } else {
        NOISY_VERBOSITY
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// CompressorOptions
// ─────────────────────────────────────────────────────────────────────────────

/// Resolved compressor configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressorOptions {
    /// Initial source staging capacity; 0 = default (256 KiB).
    pub source_buffer_length: usize,
    /// Initial destination capacity; 0 = default (64 KiB).
    pub destination_buffer_length: usize,
    /// Block size in 100 kB units, `1..=9`.
    pub block_size: u32,
    /// Fallback-sort threshold, `1..=250`; `None` = library default.
    pub work_factor: Option<u32>,
    /// Release the runtime worker around each native call.
    pub concurrency_release: bool,
    /// Suppress libbz2 diagnostics on stderr.
    pub quiet: bool,
}

impl Default for CompressorOptions {
    fn default() -> Self {
        CompressorOptions {
            source_buffer_length: 0,
            destination_buffer_length: 0,
            block_size: DEFAULT_BLOCK_SIZE,
            work_factor: None,
            concurrency_release: false,
            quiet: true,
        }
    }
}

impl CompressorOptions {
    pub fn builder() -> CompressorOptionsBuilder {
        CompressorOptionsBuilder::default()
    }

    /// Re-check a value that may have been assembled field by field.
    pub fn validate(&self) -> Result<()> {
        validate_range("block_size", i64::from(self.block_size), MIN_BLOCK_SIZE, MAX_BLOCK_SIZE)?;
        if let Some(wf) = self.work_factor {
            validate_range("work_factor", i64::from(wf), MIN_WORK_FACTOR, MAX_WORK_FACTOR)?;
        }
        Ok(())
    }

    pub fn native_block_size(&self) -> i32 {
        self.block_size as i32
    }

    pub fn native_work_factor(&self) -> i32 {
        self.work_factor.unwrap_or(LIBRARY_DEFAULT_WORK_FACTOR) as i32
    }

    pub fn verbosity(&self) -> i32 {
        verbosity_for(self.quiet)
    }

    pub fn resolved_source_buffer_length(&self) -> usize {
        match self.source_buffer_length {
            0 => DEFAULT_SOURCE_BUFFER_LENGTH_FOR_COMPRESSOR,
            n => n,
        }
    }

    pub fn resolved_destination_buffer_length(&self) -> usize {
        match self.destination_buffer_length {
            0 => DEFAULT_DESTINATION_BUFFER_LENGTH_FOR_COMPRESSOR,
            n => n,
        }
    }

    /// Decompressor options that mirror the shared fields of `self`
    /// (buffer lengths swapped to match the reversed data direction).
    pub fn compatible_decompressor_options(&self) -> DecompressorOptions {
        DecompressorOptions {
            source_buffer_length: self.destination_buffer_length,
            destination_buffer_length: self.source_buffer_length,
            small: false,
            concurrency_release: self.concurrency_release,
            quiet: self.quiet,
        }
    }
}

/// Fluent builder for [`CompressorOptions`]. Errors from `try_*` setters are
/// deferred to [`CompressorOptionsBuilder::build`].
#[derive(Debug, Default)]
pub struct CompressorOptionsBuilder {
    opts: CompressorOptions,
    error: Option<BzsError>,
}

impl CompressorOptionsBuilder {
    fn record(&mut self, e: BzsError) {
        if self.error.is_none() {
            self.error = Some(e);
        }
    }

    pub fn source_buffer_length(mut self, len: usize) -> Self {
        self.opts.source_buffer_length = len;
        self
    }

    pub fn destination_buffer_length(mut self, len: usize) -> Self {
        self.opts.destination_buffer_length = len;
        self
    }

    pub fn try_source_buffer_length(mut self, len: i64) -> Self {
        match validate_not_negative("source_buffer_length", len) {
            Ok(v) => self.opts.source_buffer_length = v,
            Err(e) => self.record(e),
        }
        self
    }

    pub fn try_destination_buffer_length(mut self, len: i64) -> Self {
        match validate_not_negative("destination_buffer_length", len) {
            Ok(v) => self.opts.destination_buffer_length = v,
            Err(e) => self.record(e),
        }
        self
    }

    pub fn block_size(mut self, block_size: u32) -> Self {
        self.opts.block_size = block_size;
        self
    }

    pub fn try_block_size(mut self, block_size: i64) -> Self {
        match validate_range("block_size", block_size, MIN_BLOCK_SIZE, MAX_BLOCK_SIZE) {
            Ok(v) => self.opts.block_size = v,
            Err(e) => self.record(e),
        }
        self
    }

    pub fn work_factor(mut self, work_factor: Option<u32>) -> Self {
        self.opts.work_factor = work_factor;
        self
    }

    pub fn try_work_factor(mut self, work_factor: i64) -> Self {
        match validate_range("work_factor", work_factor, MIN_WORK_FACTOR, MAX_WORK_FACTOR) {
            Ok(v) => self.opts.work_factor = Some(v),
            Err(e) => self.record(e),
        }
        self
    }

    pub fn concurrency_release(mut self, enabled: bool) -> Self {
        self.opts.concurrency_release = enabled;
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.opts.quiet = quiet;
        self
    }

    pub fn build(self) -> Result<CompressorOptions> {
        if let Some(e) = self.error {
            return Err(e);
        }
        self.opts.validate()?;
        Ok(self.opts)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// DecompressorOptions
// ─────────────────────────────────────────────────────────────────────────────

/// Resolved decompressor configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecompressorOptions {
    /// Initial source staging capacity; 0 = default (64 KiB).
    pub source_buffer_length: usize,
    /// Initial destination capacity; 0 = default (256 KiB).
    pub destination_buffer_length: usize,
    /// Use the low-memory decode variant (about half the memory, slower).
    pub small: bool,
    pub concurrency_release: bool,
    pub quiet: bool,
}

impl Default for DecompressorOptions {
    fn default() -> Self {
        DecompressorOptions {
            source_buffer_length: 0,
            destination_buffer_length: 0,
            small: false,
            concurrency_release: false,
            quiet: true,
        }
    }
}

impl DecompressorOptions {
    pub fn builder() -> DecompressorOptionsBuilder {
        DecompressorOptionsBuilder {
            opts: DecompressorOptions::default(),
            error: None,
        }
    }

    pub fn native_small(&self) -> i32 {
        i32::from(self.small)
    }

    pub fn verbosity(&self) -> i32 {
        verbosity_for(self.quiet)
    }

    pub fn resolved_source_buffer_length(&self) -> usize {
        match self.source_buffer_length {
            0 => DEFAULT_SOURCE_BUFFER_LENGTH_FOR_DECOMPRESSOR,
            n => n,
        }
    }

    pub fn resolved_destination_buffer_length(&self) -> usize {
        match self.destination_buffer_length {
            0 => DEFAULT_DESTINATION_BUFFER_LENGTH_FOR_DECOMPRESSOR,
            n => n,
        }
    }
}

/// Fluent builder for [`DecompressorOptions`]; `quiet` defaults to `true`.
#[derive(Debug)]
pub struct DecompressorOptionsBuilder {
    opts: DecompressorOptions,
    error: Option<BzsError>,
}

impl DecompressorOptionsBuilder {
    fn record(&mut self, e: BzsError) {
        if self.error.is_none() {
            self.error = Some(e);
        }
    }

    pub fn source_buffer_length(mut self, len: usize) -> Self {
        self.opts.source_buffer_length = len;
        self
    }

    pub fn destination_buffer_length(mut self, len: usize) -> Self {
        self.opts.destination_buffer_length = len;
        self
    }

    pub fn try_source_buffer_length(mut self, len: i64) -> Self {
        match validate_not_negative("source_buffer_length", len) {
            Ok(v) => self.opts.source_buffer_length = v,
            Err(e) => self.record(e),
        }
        self
    }

    pub fn try_destination_buffer_length(mut self, len: i64) -> Self {
        match validate_not_negative("destination_buffer_length", len) {
            Ok(v) => self.opts.destination_buffer_length = v,
            Err(e) => self.record(e),
        }
        self
    }

    pub fn small(mut self, small: bool) -> Self {
        self.opts.small = small;
        self
    }

    pub fn concurrency_release(mut self, enabled: bool) -> Self {
        self.opts.concurrency_release = enabled;
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.opts.quiet = quiet;
        self
    }

    pub fn build(self) -> Result<DecompressorOptions> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.opts),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compressor_defaults() {
        let o = CompressorOptions::builder().build().unwrap();
        assert_eq!(o, CompressorOptions::default());
        assert_eq!(o.native_block_size(), 9);
        assert_eq!(o.native_work_factor(), 0);
        assert_eq!(o.verbosity(), 0);
        assert_eq!(o.resolved_source_buffer_length(), 256 * 1024);
        assert_eq!(o.resolved_destination_buffer_length(), 64 * 1024);
    }

    #[test]
    fn decompressor_defaults() {
        let o = DecompressorOptions::builder().build().unwrap();
        assert!(o.quiet);
        assert!(!o.small);
        assert_eq!(o.native_small(), 0);
        assert_eq!(o.resolved_source_buffer_length(), 64 * 1024);
        assert_eq!(o.resolved_destination_buffer_length(), 256 * 1024);
    }

    #[test]
    fn block_size_boundaries() {
        for bad in [0i64, 10, -1] {
            let r = CompressorOptions::builder().try_block_size(bad).build();
            assert!(matches!(r, Err(BzsError::ValidateError(_))), "block_size {bad}");
        }
        for good in [1i64, 5, 9] {
            let o = CompressorOptions::builder().try_block_size(good).build().unwrap();
            assert_eq!(i64::from(o.block_size), good);
        }
    }

    #[test]
    fn work_factor_boundaries() {
        for bad in [0i64, 251] {
            let r = CompressorOptions::builder().try_work_factor(bad).build();
            assert!(matches!(r, Err(BzsError::ValidateError(_))), "work_factor {bad}");
        }
        let o = CompressorOptions::builder().try_work_factor(250).build().unwrap();
        assert_eq!(o.native_work_factor(), 250);
    }

    #[test]
    fn direct_field_values_are_revalidated() {
        let r = CompressorOptions::builder().block_size(12).build();
        assert!(matches!(r, Err(BzsError::ValidateError(_))));
        let bad = CompressorOptions { work_factor: Some(0), ..CompressorOptions::default() };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn negative_buffer_lengths_rejected() {
        let r = CompressorOptions::builder().try_destination_buffer_length(-1).build();
        assert!(matches!(r, Err(BzsError::ValidateError(_))));
        let r = DecompressorOptions::builder().try_source_buffer_length(-512).build();
        assert!(matches!(r, Err(BzsError::ValidateError(_))));
    }

    #[test]
    fn first_error_wins() {
        let r = CompressorOptions::builder()
            .try_block_size(0)
            .try_work_factor(999)
            .build();
        match r {
            Err(BzsError::ValidateError(msg)) => assert!(msg.contains("block_size")),
            other => panic!("expected block_size error, got {other:?}"),
        }
    }

    #[test]
    fn quiet_controls_verbosity() {
        let o = CompressorOptions::builder().quiet(false).build().unwrap();
        assert_eq!(o.verbosity(), NOISY_VERBOSITY);
        let d = DecompressorOptions::builder().quiet(false).build().unwrap();
        assert_eq!(d.verbosity(), NOISY_VERBOSITY);
    }

    #[test]
    fn compatible_decompressor_mirrors_shared_fields() {
        let c = CompressorOptions::builder()
            .source_buffer_length(512)
            .destination_buffer_length(1024)
            .concurrency_release(true)
            .build()
            .unwrap();
        let d = c.compatible_decompressor_options();
        assert_eq!(d.source_buffer_length, 1024);
        assert_eq!(d.destination_buffer_length, 512);
        assert!(d.concurrency_release);
        assert!(d.quiet);
    }
}
