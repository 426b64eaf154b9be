//! Owned libbz2 stream handles and the single native step.
//!
//! This is the only module that touches `bzip2_sys`. Each handle owns a boxed
//! `bz_stream` (libbz2 stores a back pointer to it, so it must never move
//! after init) and ends it exactly once, either through [`Drop`] or when the
//! owning codec drops it during `close`.
//!
//! One call to [`CompressHandle::step`] / [`DecompressHandle::step`] performs
//! exactly one native call and decodes its status into a [`StepOutcome`]; raw
//! result codes never leave this module.

use std::ffi::CStr;
use std::mem;

use bzip2_sys as ffi;
use libc::{c_char, c_int, c_uint};

use crate::buffer::consume_size;
use crate::error::{BzsError, Result};

extern "C" {
    // Part of every libbz2 build; bzip2-sys does not re-export it.
    fn BZ2_bzlibVersion() -> *const c_char;
}

/// Version string of the linked libbz2, e.g. `"1.0.8, 13-Jul-2019"`.
pub fn library_version() -> String {
    // SAFETY: returns a pointer to a static NUL-terminated string.
    let ptr = unsafe { BZ2_bzlibVersion() };
    if ptr.is_null() {
        return String::new();
    }
    unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
}

/// Compression action requested for one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Run,
    Flush,
    Finish,
}

impl Action {
    fn native(self) -> c_int {
        match self {
            Action::Run => ffi::BZ_RUN,
            Action::Flush => ffi::BZ_FLUSH,
            Action::Finish => ffi::BZ_FINISH,
        }
    }
}

/// Decoded status of one native step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Work was done; the current phase is not complete.
    Progress,
    /// A flush completed (`BZ_RUN_OK` in answer to `BZ_FLUSH`).
    Boundary,
    /// End-of-stream marker written or read.
    StreamEnd,
    /// `BZ_RUN` had nothing to do: no input and nothing pending.
    Idle,
}

/// Bytes moved and decoded status of one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    pub consumed: usize,
    pub produced: usize,
    pub step: Step,
}

/// Maps a native error code onto the crate taxonomy.
fn map_error(code: c_int) -> BzsError {
    match code {
        ffi::BZ_PARAM_ERROR => BzsError::ParamError,
        ffi::BZ_MEM_ERROR => BzsError::MemError,
        ffi::BZ_DATA_ERROR => BzsError::DataError,
        ffi::BZ_DATA_ERROR_MAGIC => BzsError::DataErrorMagic,
        ffi::BZ_UNEXPECTED_EOF => BzsError::UnexpectedEof,
        ffi::BZ_SEQUENCE_ERROR => BzsError::Unexpected("libbz2 sequence error"),
        ffi::BZ_CONFIG_ERROR => BzsError::Unexpected("libbz2 is miscompiled"),
        ffi::BZ_IO_ERROR => BzsError::Unexpected("libbz2 i/o error"),
        ffi::BZ_OUTBUFF_FULL => BzsError::Unexpected("libbz2 output buffer full"),
        _ => BzsError::Unexpected("unknown libbz2 result code"),
    }
}

fn zeroed_stream() -> Box<ffi::bz_stream> {
    // SAFETY: an all-zero bz_stream is the documented pre-init state
    // (null allocator callbacks select malloc/free).
    Box::new(unsafe { mem::zeroed() })
}

/// Points the stream at `input` / `output`, clamped to what a `c_uint` holds.
fn bind(strm: &mut ffi::bz_stream, input: &[u8], output: &mut [u8]) -> (usize, usize) {
    let avail_in = consume_size(input.len());
    let avail_out = consume_size(output.len());
    strm.next_in = input.as_ptr() as *mut c_char;
    strm.avail_in = avail_in as c_uint;
    strm.next_out = output.as_mut_ptr() as *mut c_char;
    strm.avail_out = avail_out as c_uint;
    (avail_in, avail_out)
}

/// Drops the borrowed pointers and reports how much was consumed / produced.
fn unbind(strm: &mut ffi::bz_stream, avail_in: usize, avail_out: usize) -> (usize, usize) {
    let consumed = avail_in - strm.avail_in as usize;
    let produced = avail_out - strm.avail_out as usize;
    strm.next_in = std::ptr::null_mut();
    strm.avail_in = 0;
    strm.next_out = std::ptr::null_mut();
    strm.avail_out = 0;
    (consumed, produced)
}

#[inline]
fn total(lo: c_uint, hi: c_uint) -> u64 {
    (u64::from(hi) << 32) | u64::from(lo)
}

// ─────────────────────────────────────────────────────────────────────────────
// CompressHandle
// ─────────────────────────────────────────────────────────────────────────────

/// An initialised libbz2 compression stream.
pub struct CompressHandle {
    strm: Box<ffi::bz_stream>,
}

// SAFETY: the bz_stream and the state it points to are owned exclusively by
// this handle; the input/output pointers are only set for the duration of a
// `&mut self` call.
unsafe impl Send for CompressHandle {}

impl CompressHandle {
    pub fn new(block_size: c_int, verbosity: c_int, work_factor: c_int) -> Result<Self> {
        let mut strm = zeroed_stream();
        // SAFETY: strm is zeroed and boxed, so its address is stable.
        let rc = unsafe { ffi::BZ2_bzCompressInit(&mut *strm, block_size, verbosity, work_factor) };
        if rc != ffi::BZ_OK {
            return Err(map_error(rc));
        }
        Ok(CompressHandle { strm })
    }

    /// One `BZ2_bzCompress` call.
    ///
    /// A `BZ_PARAM_ERROR` in answer to `BZ_RUN` is libbz2's "no progress"
    /// signal and decodes as [`Step::Idle`].
    pub fn step(&mut self, input: &[u8], output: &mut [u8], action: Action) -> Result<StepOutcome> {
        let (avail_in, avail_out) = bind(&mut self.strm, input, output);
        // SAFETY: the stream is initialised and next_in/next_out cover
        // avail_in/avail_out bytes of live slices for the whole call.
        let rc = unsafe { ffi::BZ2_bzCompress(&mut *self.strm, action.native()) };
        let (consumed, produced) = unbind(&mut self.strm, avail_in, avail_out);

        let step = match (rc, action) {
            (ffi::BZ_RUN_OK, Action::Flush) => Step::Boundary,
            (ffi::BZ_RUN_OK, _) | (ffi::BZ_FLUSH_OK, _) | (ffi::BZ_FINISH_OK, _) => Step::Progress,
            (ffi::BZ_STREAM_END, _) => Step::StreamEnd,
            (ffi::BZ_PARAM_ERROR, Action::Run) if consumed == 0 && produced == 0 => Step::Idle,
            (code, _) => return Err(map_error(code)),
        };
        crate::displaylevel!(
            5,
            "bzs: compress {:?} in={} out={} -> {:?}\n",
            action,
            consumed,
            produced,
            step
        );
        Ok(StepOutcome { consumed, produced, step })
    }

    pub fn total_in(&self) -> u64 {
        total(self.strm.total_in_lo32, self.strm.total_in_hi32)
    }

    pub fn total_out(&self) -> u64 {
        total(self.strm.total_out_lo32, self.strm.total_out_hi32)
    }
}

impl Drop for CompressHandle {
    fn drop(&mut self) {
        // SAFETY: initialised in `new`; Drop runs once.
        unsafe {
            ffi::BZ2_bzCompressEnd(&mut *self.strm);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// DecompressHandle
// ─────────────────────────────────────────────────────────────────────────────

/// An initialised libbz2 decompression stream.
pub struct DecompressHandle {
    strm: Box<ffi::bz_stream>,
}

// SAFETY: see CompressHandle.
unsafe impl Send for DecompressHandle {}

impl DecompressHandle {
    pub fn new(verbosity: c_int, small: c_int) -> Result<Self> {
        let mut strm = zeroed_stream();
        // SAFETY: strm is zeroed and boxed.
        let rc = unsafe { ffi::BZ2_bzDecompressInit(&mut *strm, verbosity, small) };
        if rc != ffi::BZ_OK {
            return Err(map_error(rc));
        }
        Ok(DecompressHandle { strm })
    }

    /// One `BZ2_bzDecompress` call. Must not be called again after
    /// [`Step::StreamEnd`]; libbz2 answers that with a sequence error.
    pub fn step(&mut self, input: &[u8], output: &mut [u8]) -> Result<StepOutcome> {
        let (avail_in, avail_out) = bind(&mut self.strm, input, output);
        // SAFETY: as in CompressHandle::step.
        let rc = unsafe { ffi::BZ2_bzDecompress(&mut *self.strm) };
        let (consumed, produced) = unbind(&mut self.strm, avail_in, avail_out);

        let step = match rc {
            ffi::BZ_OK => Step::Progress,
            ffi::BZ_STREAM_END => Step::StreamEnd,
            code => return Err(map_error(code)),
        };
        crate::displaylevel!(
            5,
            "bzs: decompress in={} out={} -> {:?}\n",
            consumed,
            produced,
            step
        );
        Ok(StepOutcome { consumed, produced, step })
    }

    pub fn total_in(&self) -> u64 {
        total(self.strm.total_in_lo32, self.strm.total_in_hi32)
    }

    pub fn total_out(&self) -> u64 {
        total(self.strm.total_out_lo32, self.strm.total_out_hi32)
    }
}

impl Drop for DecompressHandle {
    fn drop(&mut self) {
        // SAFETY: initialised in `new`; Drop runs once.
        unsafe {
            ffi::BZ2_bzDecompressEnd(&mut *self.strm);
        }
    }
}
