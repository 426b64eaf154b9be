//! Streaming adaptors over `std::io`.
//!
//! # Public API
//! - [`BzWriter`]: compresses everything written to it into an inner `Write`
//! - [`BzReader`]: decompresses an inner `Read`, concatenated streams included
//! - [`compress_io`] / [`decompress_io`]: reader → writer pumps
//! - [`compress_file`] / [`decompress_file`]: the same, on paths
//!
//! The adaptors report engine failures through `io::Error`; the original
//! [`BzsError`] rides along as the payload and can be recovered with
//! [`BzsError::from_io`].

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::buffer::try_zeroed;
use crate::error::{BzsError, Result};
use crate::option::{CompressorOptions, DecompressorOptions};
use crate::stream::{Compressor, CompressorState, Decompressor};

fn read_retrying<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match reader.read(buf) {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            other => return other,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// BzWriter<W>
// ─────────────────────────────────────────────────────────────────────────────

/// Compressing writer.
///
/// Call [`BzWriter::finish`] to write the stream trailer and get the inner
/// writer back. If the writer is dropped instead, the trailer is written on a
/// best-effort basis and any error is lost.
///
/// ```no_run
/// use bzs::file::BzWriter;
/// use bzs::option::CompressorOptions;
/// use std::io::Write;
///
/// let mut w = BzWriter::new(Vec::new(), &CompressorOptions::default()).unwrap();
/// w.write_all(b"hello").unwrap();
/// let packed: Vec<u8> = w.finish().unwrap();
/// ```
pub struct BzWriter<W: Write> {
    compressor: Compressor,
    // `None` once `finish` handed the writer back.
    inner: Option<W>,
    // Sticky: after a failed write the stream is not finalised on drop.
    errored: bool,
}

impl<W: Write> BzWriter<W> {
    pub fn new(writer: W, options: &CompressorOptions) -> Result<Self> {
        Ok(BzWriter {
            compressor: Compressor::new(*options)?,
            inner: Some(writer),
            errored: false,
        })
    }

    pub fn get_ref(&self) -> Option<&W> {
        self.inner.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut W> {
        self.inner.as_mut()
    }

    pub fn total_in(&self) -> u64 {
        self.compressor.total_in()
    }

    pub fn total_out(&self) -> u64 {
        self.compressor.total_out()
    }

    fn emit(&mut self, bytes: &[u8]) -> io::Result<()> {
        if bytes.is_empty() {
            return Ok(());
        }
        let inner = self
            .inner
            .as_mut()
            .ok_or_else(|| io::Error::from(BzsError::UsedAfterClose))?;
        inner.write_all(bytes).inspect_err(|_| self.errored = true)
    }

    fn finalize(&mut self) -> io::Result<()> {
        if self.compressor.state().accepts_input() {
            let tail = self.compressor.finish().inspect_err(|_| self.errored = true)?;
            self.emit(&tail)?;
        }
        if let Some(inner) = self.inner.as_mut() {
            inner.flush()?;
        }
        Ok(())
    }

    /// Writes the end-of-stream trailer and returns the inner writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.finalize()?;
        self.compressor.close()?;
        self.inner
            .take()
            .ok_or_else(|| io::Error::from(BzsError::UsedAfterClose))
    }
}

impl<W: Write> Write for BzWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let out = self.compressor.write(buf).inspect_err(|_| self.errored = true)?;
        self.emit(&out)?;
        Ok(buf.len())
    }

    /// Closes the current bzip2 block, writes its bytes out and flushes the
    /// inner writer.
    fn flush(&mut self) -> io::Result<()> {
        if self.compressor.state() == CompressorState::Running {
            let out = self.compressor.flush().inspect_err(|_| self.errored = true)?;
            self.emit(&out)?;
        }
        match self.inner.as_mut() {
            Some(inner) => inner.flush(),
            None => Ok(()),
        }
    }
}

impl<W: Write> Drop for BzWriter<W> {
    fn drop(&mut self) {
        if self.inner.is_some() && !self.errored {
            let _ = self.finalize();
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// BzReader<R>
// ─────────────────────────────────────────────────────────────────────────────

/// Decompressing reader.
///
/// With `multi_stream` enabled (the default) concatenated bzip2 streams are
/// decoded back to back, like the `bzip2` tool does. With it disabled the
/// reader stops after the first stream; bytes it had already pulled past that
/// stream are available from [`BzReader::trailing_input`].
pub struct BzReader<R: Read> {
    inner: R,
    options: DecompressorOptions,
    decompressor: Decompressor,
    source: Vec<u8>,
    pending: Vec<u8>,
    pending_pos: usize,
    multi_stream: bool,
    trailing: Vec<u8>,
    done: bool,
}

impl<R: Read> BzReader<R> {
    pub fn new(reader: R, options: &DecompressorOptions) -> Result<Self> {
        Ok(BzReader {
            inner: reader,
            options: *options,
            decompressor: Decompressor::new(*options)?,
            source: try_zeroed(options.resolved_source_buffer_length())?,
            pending: Vec::new(),
            pending_pos: 0,
            multi_stream: true,
            trailing: Vec::new(),
            done: false,
        })
    }

    /// Decode only the first stream.
    pub fn single_stream(mut self) -> Self {
        self.multi_stream = false;
        self
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Input read past the end of the first stream (single-stream mode).
    pub fn trailing_input(&self) -> &[u8] {
        &self.trailing
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Pulls more compressed input and refills `pending`. Returns `false`
    /// once the reader is exhausted.
    fn refill(&mut self) -> Result<bool> {
        loop {
            if self.done {
                return Ok(false);
            }
            if self.decompressor.is_finished() {
                let mut seed = self.decompressor.take_trailing_input();
                if !self.multi_stream {
                    self.trailing = seed;
                    self.done = true;
                    continue;
                }
                if seed.is_empty() {
                    let n = read_retrying(&mut self.inner, &mut self.source)?;
                    if n == 0 {
                        self.done = true;
                        continue;
                    }
                    seed.extend_from_slice(&self.source[..n]);
                }
                crate::displaylevel!(4, "bzs: next concatenated stream\n");
                self.decompressor.close()?;
                self.decompressor = Decompressor::new(self.options)?;
                self.pending = self.decompressor.read(&seed)?;
            } else {
                let n = read_retrying(&mut self.inner, &mut self.source)?;
                if n == 0 {
                    self.decompressor.finish_input()?;
                    self.done = true;
                    continue;
                }
                self.pending = self.decompressor.read(&self.source[..n])?;
            }
            self.pending_pos = 0;
            if !self.pending.is_empty() {
                return Ok(true);
            }
        }
    }
}

impl<R: Read> Read for BzReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if self.pending_pos == self.pending.len() && !self.refill()? {
            return Ok(0);
        }
        let available = &self.pending[self.pending_pos..];
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.pending_pos += n;
        Ok(n)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Convenience functions
// ─────────────────────────────────────────────────────────────────────────────

/// Compresses everything from `reader` into `writer` as one bzip2 stream.
///
/// Returns `(bytes read, bytes written)`.
pub fn compress_io<R: Read, W: Write>(
    mut reader: R,
    writer: W,
    options: &CompressorOptions,
) -> Result<(u64, u64)> {
    let mut bzw = BzWriter::new(writer, options)?;
    let mut chunk = try_zeroed(options.resolved_source_buffer_length())?;
    loop {
        let n = read_retrying(&mut reader, &mut chunk)?;
        if n == 0 {
            break;
        }
        bzw.write_all(&chunk[..n]).map_err(BzsError::from_io)?;
    }
    bzw.finalize().map_err(BzsError::from_io)?;
    let totals = (bzw.total_in(), bzw.total_out());
    bzw.finish().map_err(BzsError::from_io)?;
    Ok(totals)
}

/// Decompresses every stream from `reader` into `writer`.
///
/// Returns `(bytes read, bytes written)`.
pub fn decompress_io<R: Read, W: Write>(
    reader: R,
    mut writer: W,
    options: &DecompressorOptions,
) -> Result<(u64, u64)> {
    let counted = CountingReader { inner: reader, count: 0 };
    let mut bzr = BzReader::new(counted, options)?;
    let written = io::copy(&mut bzr, &mut writer).map_err(BzsError::from_io)?;
    writer.flush()?;
    Ok((bzr.get_ref().count, written))
}

/// Compresses the file at `src` into a new file at `dst`.
pub fn compress_file(src: &Path, dst: &Path, options: &CompressorOptions) -> Result<(u64, u64)> {
    let reader = BufReader::new(File::open(src)?);
    let writer = BufWriter::new(File::create(dst)?);
    compress_io(reader, writer, options)
}

/// Decompresses the file at `src` into a new file at `dst`.
pub fn decompress_file(src: &Path, dst: &Path, options: &DecompressorOptions) -> Result<(u64, u64)> {
    let reader = BufReader::new(File::open(src)?);
    let writer = BufWriter::new(File::create(dst)?);
    decompress_io(reader, writer, options)
}

/// Decodes every stream from `reader` and discards the output.
pub fn test_io<R: Read>(reader: R, options: &DecompressorOptions) -> Result<u64> {
    decompress_io(reader, io::sink(), options).map(|(_, written)| written)
}

struct CountingReader<R> {
    inner: R,
    count: u64,
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.count += n as u64;
        Ok(n)
    }
}
