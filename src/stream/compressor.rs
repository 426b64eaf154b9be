//! Streaming bzip2 compressor.
//!
//! Each public call runs to completion: the whole input slice is fed to
//! `BZ2_bzCompress` in a loop and every byte produced by that call is
//! returned. The destination buffer grows whenever a step leaves it full.
//!
//! ```text
//! Fresh ──write──▶ Running ──flush──▶ Flushing ──▶ Running
//!   │                 │
//!   └──────finish─────┴──▶ Finishing ──▶ Ended ──close──▶ Closed
//! ```

use crate::buffer::{DestinationBuffer, SourceCursor};
use crate::error::{BzsError, Result};
use crate::gate::Gate;
use crate::native::{Action, CompressHandle, Step};
use crate::option::CompressorOptions;
use crate::stream::types::CompressorState;

pub struct Compressor {
    options: CompressorOptions,
    state: CompressorState,
    handle: Option<CompressHandle>,
    destination: Option<DestinationBuffer>,
    gate: Gate,
    // Totals captured at close, once the handle is gone.
    closed_totals: (u64, u64),
}

impl Compressor {
    /// Validates `options`, initialises the native stream and allocates the
    /// destination buffer.
    pub fn new(options: CompressorOptions) -> Result<Self> {
        options.validate()?;
        let handle = CompressHandle::new(
            options.native_block_size(),
            options.verbosity(),
            options.native_work_factor(),
        )?;
        let destination = DestinationBuffer::new(options.resolved_destination_buffer_length())?;
        crate::displaylevel!(
            4,
            "bzs: compressor block_size={} work_factor={}\n",
            options.block_size,
            options.native_work_factor()
        );
        Ok(Compressor {
            options,
            state: CompressorState::Fresh,
            handle: Some(handle),
            destination: Some(destination),
            gate: Gate::new(options.concurrency_release),
            closed_totals: (0, 0),
        })
    }

    pub fn state(&self) -> CompressorState {
        self.state
    }

    pub fn options(&self) -> &CompressorOptions {
        &self.options
    }

    /// Uncompressed bytes consumed so far.
    pub fn total_in(&self) -> u64 {
        self.handle.as_ref().map_or(self.closed_totals.0, |h| h.total_in())
    }

    /// Compressed bytes produced so far.
    pub fn total_out(&self) -> u64 {
        self.handle.as_ref().map_or(self.closed_totals.1, |h| h.total_out())
    }

    fn check_open(&self) -> Result<()> {
        if self.state == CompressorState::Closed {
            return Err(BzsError::UsedAfterClose);
        }
        Ok(())
    }

    fn parts(&mut self) -> Result<(&mut CompressHandle, &mut DestinationBuffer)> {
        match (self.handle.as_mut(), self.destination.as_mut()) {
            (Some(h), Some(d)) => Ok((h, d)),
            _ => Err(BzsError::UsedAfterClose),
        }
    }

    /// Compresses `input` and returns whatever output libbz2 released.
    ///
    /// Output is usually empty until a full block has been collected; call
    /// [`flush`](Self::flush) or [`finish`](Self::finish) to force it out.
    pub fn write(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        self.check_open()?;
        if !self.state.accepts_input() {
            return Err(BzsError::validate(format!(
                "write is not allowed on a {} compressor",
                self.state
            )));
        }
        if input.is_empty() {
            return Ok(Vec::new());
        }
        self.state = CompressorState::Running;

        let gate = self.gate;
        let (handle, destination) = self.parts()?;
        let mut source = SourceCursor::new(input);
        loop {
            destination.ensure_spare()?;
            let outcome =
                gate.run(|| handle.step(source.remaining(), destination.spare(), Action::Run))?;
            source.advance(outcome.consumed);
            destination.commit(outcome.produced);

            match outcome.step {
                Step::Idle if source.is_empty() => break,
                Step::Idle => return Err(BzsError::ParamError),
                Step::Progress => {
                    if source.is_empty() && destination.spare_len() > 0 {
                        break;
                    }
                }
                Step::Boundary | Step::StreamEnd => {
                    return Err(BzsError::Unexpected("stream boundary during run"))
                }
            }
        }
        Ok(destination.take())
    }

    /// Closes the current block and returns its compressed bytes.
    ///
    /// Only valid while `Running`. libbz2 keeps up to 7 bits of the block
    /// back until the next block or the trailer, so the flushed prefix alone
    /// is not always decodable to its last byte. Frequent flushing costs
    /// compression ratio.
    pub fn flush(&mut self) -> Result<Vec<u8>> {
        self.check_open()?;
        if self.state != CompressorState::Running {
            return Err(BzsError::validate(format!(
                "flush is not allowed on a {} compressor",
                self.state
            )));
        }
        self.state = CompressorState::Flushing;
        let output = self.drive(Action::Flush, Step::Boundary)?;
        self.state = CompressorState::Running;
        Ok(output)
    }

    /// Writes the remaining blocks and the end-of-stream trailer.
    pub fn finish(&mut self) -> Result<Vec<u8>> {
        self.check_open()?;
        if !self.state.accepts_input() {
            return Err(BzsError::validate(format!(
                "finish is not allowed on a {} compressor",
                self.state
            )));
        }
        self.state = CompressorState::Finishing;
        let output = self.drive(Action::Finish, Step::StreamEnd)?;
        self.state = CompressorState::Ended;
        crate::displaylevel!(
            4,
            "bzs: compressed stream end, {} -> {} bytes\n",
            self.total_in(),
            self.total_out()
        );
        Ok(output)
    }

    /// Repeats `action` with no new input until the step reports `until`.
    fn drive(&mut self, action: Action, until: Step) -> Result<Vec<u8>> {
        let gate = self.gate;
        let (handle, destination) = self.parts()?;
        loop {
            destination.ensure_spare()?;
            let outcome = gate.run(|| handle.step(&[], destination.spare(), action))?;
            destination.commit(outcome.produced);

            if outcome.step == until {
                break;
            }
            match outcome.step {
                Step::Progress if outcome.produced == 0 && destination.spare_len() > 0 => {
                    return Err(BzsError::Unexpected("compressor made no progress"))
                }
                Step::Progress => {}
                _ => return Err(BzsError::Unexpected("unexpected compressor step")),
            }
        }
        Ok(destination.take())
    }

    /// Releases the native stream and buffers. Valid once, from any state.
    pub fn close(&mut self) -> Result<()> {
        self.check_open()?;
        self.closed_totals = (self.total_in(), self.total_out());
        self.handle = None;
        self.destination = None;
        self.state = CompressorState::Closed;
        Ok(())
    }
}

impl std::fmt::Debug for Compressor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compressor")
            .field("state", &self.state)
            .field("options", &self.options)
            .field("total_in", &self.total_in())
            .field("total_out", &self.total_out())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> CompressorOptions {
        CompressorOptions::builder()
            .destination_buffer_length(512)
            .source_buffer_length(512)
            .block_size(1)
            .build()
            .unwrap()
    }

    #[test]
    fn empty_write_is_noop() {
        let mut c = Compressor::new(small()).unwrap();
        assert!(c.write(&[]).unwrap().is_empty());
        assert_eq!(c.state(), CompressorState::Fresh);
        assert_eq!(c.total_in(), 0);
    }

    #[test]
    fn write_moves_to_running() {
        let mut c = Compressor::new(small()).unwrap();
        c.write(b"abc").unwrap();
        assert_eq!(c.state(), CompressorState::Running);
        assert_eq!(c.total_in(), 3);
    }

    #[test]
    fn flush_requires_running() {
        let mut c = Compressor::new(small()).unwrap();
        assert!(matches!(c.flush(), Err(BzsError::ValidateError(_))));
        c.write(b"abc").unwrap();
        let out = c.flush().unwrap();
        assert!(out.starts_with(b"BZh1"));
        assert_eq!(c.state(), CompressorState::Running);
    }

    #[test]
    fn finish_ends_and_blocks_further_writes() {
        let mut c = Compressor::new(small()).unwrap();
        c.write(b"hello").unwrap();
        let out = c.finish().unwrap();
        assert!(!out.is_empty());
        assert_eq!(c.state(), CompressorState::Ended);
        assert!(matches!(c.write(b"x"), Err(BzsError::ValidateError(_))));
        assert!(matches!(c.flush(), Err(BzsError::ValidateError(_))));
        assert!(matches!(c.finish(), Err(BzsError::ValidateError(_))));
    }

    #[test]
    fn finish_from_fresh_emits_empty_stream() {
        let mut c = Compressor::new(CompressorOptions::default()).unwrap();
        let out = c.finish().unwrap();
        assert_eq!(&out[..4], b"BZh9");
        assert_eq!(out.len() as u64, c.total_out());
    }

    #[test]
    fn close_twice_fails() {
        let mut c = Compressor::new(small()).unwrap();
        c.write(b"data").unwrap();
        c.close().unwrap();
        assert_eq!(c.state(), CompressorState::Closed);
        assert!(matches!(c.close(), Err(BzsError::UsedAfterClose)));
        assert!(matches!(c.write(b"x"), Err(BzsError::UsedAfterClose)));
        assert_eq!(c.total_in(), 4);
    }

    #[test]
    fn invalid_options_rejected_before_native_init() {
        let bad = CompressorOptions { block_size: 0, ..CompressorOptions::default() };
        assert!(matches!(Compressor::new(bad), Err(BzsError::ValidateError(_))));
    }
}
