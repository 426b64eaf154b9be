//! Lifecycle states of the codec instances.

use core::fmt;

/// Compressor lifecycle.
///
/// `Fresh → Running → (Flushing)* → Finishing → Ended → Closed`; `close` is
/// valid from every state except `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressorState {
    Fresh,
    Running,
    Flushing,
    Finishing,
    Ended,
    Closed,
}

impl CompressorState {
    /// `write` and `finish` are accepted.
    #[inline]
    pub fn accepts_input(self) -> bool {
        matches!(self, CompressorState::Fresh | CompressorState::Running)
    }
}

impl fmt::Display for CompressorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CompressorState::Fresh => "fresh",
            CompressorState::Running => "running",
            CompressorState::Flushing => "flushing",
            CompressorState::Finishing => "finishing",
            CompressorState::Ended => "ended",
            CompressorState::Closed => "closed",
        };
        f.write_str(s)
    }
}

/// Decompressor lifecycle: `Fresh → Running → Ended → Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecompressorState {
    Fresh,
    Running,
    Ended,
    Closed,
}

impl fmt::Display for DecompressorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DecompressorState::Fresh => "fresh",
            DecompressorState::Running => "running",
            DecompressorState::Ended => "ended",
            DecompressorState::Closed => "closed",
        };
        f.write_str(s)
    }
}
