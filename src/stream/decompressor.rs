//! Streaming bzip2 decompressor.
//!
//! One instance decodes exactly one bzip2 stream. Input that follows the
//! end-of-stream marker is never handed to libbz2; it accumulates in the
//! trailing-input store, where multi-stream callers pick it up and seed a
//! fresh decompressor with it.

use crate::buffer::{DestinationBuffer, SourceCursor};
use crate::error::{BzsError, Result};
use crate::gate::Gate;
use crate::native::{DecompressHandle, Step};
use crate::option::DecompressorOptions;
use crate::stream::types::DecompressorState;

pub struct Decompressor {
    options: DecompressorOptions,
    state: DecompressorState,
    handle: Option<DecompressHandle>,
    destination: Option<DestinationBuffer>,
    gate: Gate,
    trailing: Vec<u8>,
    closed_totals: (u64, u64),
}

impl Decompressor {
    pub fn new(options: DecompressorOptions) -> Result<Self> {
        let handle = DecompressHandle::new(options.verbosity(), options.native_small())?;
        let destination = DestinationBuffer::new(options.resolved_destination_buffer_length())?;
        Ok(Decompressor {
            options,
            state: DecompressorState::Fresh,
            handle: Some(handle),
            destination: Some(destination),
            gate: Gate::new(options.concurrency_release),
            trailing: Vec::new(),
            closed_totals: (0, 0),
        })
    }

    pub fn state(&self) -> DecompressorState {
        self.state
    }

    pub fn options(&self) -> &DecompressorOptions {
        &self.options
    }

    /// `true` once the end-of-stream marker has been decoded.
    pub fn is_finished(&self) -> bool {
        self.state == DecompressorState::Ended
    }

    /// Bytes received after the end-of-stream marker.
    pub fn trailing_input(&self) -> &[u8] {
        &self.trailing
    }

    pub fn take_trailing_input(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.trailing)
    }

    /// Compressed bytes consumed by libbz2 (trailing input excluded).
    pub fn total_in(&self) -> u64 {
        self.handle.as_ref().map_or(self.closed_totals.0, |h| h.total_in())
    }

    /// Decompressed bytes produced so far.
    pub fn total_out(&self) -> u64 {
        self.handle.as_ref().map_or(self.closed_totals.1, |h| h.total_out())
    }

    fn check_open(&self) -> Result<()> {
        if self.state == DecompressorState::Closed {
            return Err(BzsError::UsedAfterClose);
        }
        Ok(())
    }

    /// Decodes `input` and returns the plaintext it produced.
    ///
    /// Once the stream has ended, further input is stored as trailing input
    /// and an empty vector is returned.
    pub fn read(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        self.check_open()?;
        if input.is_empty() {
            return Ok(Vec::new());
        }
        if self.state == DecompressorState::Ended {
            self.trailing.extend_from_slice(input);
            return Ok(Vec::new());
        }
        self.state = DecompressorState::Running;

        let Decompressor {
            state,
            handle,
            destination,
            gate,
            trailing,
            ..
        } = self;
        let (handle, destination) = match (handle.as_mut(), destination.as_mut()) {
            (Some(h), Some(d)) => (h, d),
            _ => return Err(BzsError::UsedAfterClose),
        };

        let mut source = SourceCursor::new(input);
        loop {
            destination.ensure_spare()?;
            let outcome = gate.run(|| handle.step(source.remaining(), destination.spare()))?;
            source.advance(outcome.consumed);
            destination.commit(outcome.produced);

            match outcome.step {
                Step::StreamEnd => {
                    *state = DecompressorState::Ended;
                    trailing.extend_from_slice(source.remaining());
                    crate::displaylevel!(
                        4,
                        "bzs: decompressed stream end, {} -> {} bytes ({} trailing)\n",
                        handle.total_in(),
                        handle.total_out(),
                        trailing.len()
                    );
                    break;
                }
                Step::Progress => {
                    let spare = destination.spare_len();
                    if source.is_empty() && spare > 0 {
                        break;
                    }
                    if outcome.consumed == 0 && outcome.produced == 0 && spare > 0 {
                        return Err(BzsError::Unexpected("decompressor made no progress"));
                    }
                }
                Step::Boundary | Step::Idle => {
                    return Err(BzsError::Unexpected("unexpected decompressor step"))
                }
            }
        }
        Ok(destination.take())
    }

    /// Declares that no more input will arrive.
    ///
    /// Fails with [`BzsError::UnexpectedEof`] if a stream was started but its
    /// end-of-stream marker was never reached.
    pub fn finish_input(&self) -> Result<()> {
        match self.state {
            DecompressorState::Closed => Err(BzsError::UsedAfterClose),
            DecompressorState::Running => Err(BzsError::UnexpectedEof),
            DecompressorState::Fresh | DecompressorState::Ended => Ok(()),
        }
    }

    /// Releases the native stream and buffers. Valid once, from any state.
    pub fn close(&mut self) -> Result<()> {
        self.check_open()?;
        self.closed_totals = (self.total_in(), self.total_out());
        self.handle = None;
        self.destination = None;
        self.trailing = Vec::new();
        self.state = DecompressorState::Closed;
        Ok(())
    }
}

impl std::fmt::Debug for Decompressor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Decompressor")
            .field("state", &self.state)
            .field("options", &self.options)
            .field("trailing", &self.trailing.len())
            .finish()
    }
}
