//! Error taxonomy for the codec engine and its adaptors.
//!
//! Every native result code is translated into a [`BzsError`] inside
//! [`crate::native`]; no raw libbz2 status crosses that boundary.
//!
//! Kinds:
//! - `ParamError` / `MemError`: the native library rejected a parameter or
//!   failed to allocate.
//! - `DataError` / `DataErrorMagic` / `UnexpectedEof`: the compressed input
//!   is corrupt, lacks the `BZh` header, or ends mid-stream.
//! - `UsedAfterClose`: an operation on an instance whose `close` completed.
//! - `ValidateError`: invalid option, or an operation not valid in the
//!   current lifecycle state. Always raised before any native call.
//! - `Unexpected`: sequence/config errors and anything the library should
//!   never report to a well-behaved caller.
//! - `Io`: read/write failures in the stream adaptors.

use core::fmt;
use std::io;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, BzsError>;

#[derive(Debug)]
pub enum BzsError {
    /// Invalid or inconsistent parameter passed to a native call.
    ParamError,
    /// Native allocation failure.
    MemError,
    /// Corrupted stream content detected during decode.
    DataError,
    /// Missing or corrupted `BZh` stream header.
    DataErrorMagic,
    /// Input ended before the end-of-stream marker.
    UnexpectedEof,
    /// Operation invoked after `close` completed.
    UsedAfterClose,
    /// Option validation failure or operation invalid in the current state.
    ValidateError(String),
    /// Native status the engine never expects (sequence, config, unknown).
    Unexpected(&'static str),
    /// Underlying reader/writer failure (adaptor layer only).
    Io(io::Error),
}

impl BzsError {
    /// Build a `ValidateError` with a formatted message.
    pub fn validate(msg: impl fmt::Display) -> Self {
        BzsError::ValidateError(msg.to_string())
    }

    /// Stable identifier for the error kind, independent of the message.
    pub fn error_name(&self) -> &'static str {
        match self {
            BzsError::ParamError => "ParamError",
            BzsError::MemError => "MemError",
            BzsError::DataError => "DataError",
            BzsError::DataErrorMagic => "DataErrorMagic",
            BzsError::UnexpectedEof => "UnexpectedEof",
            BzsError::UsedAfterClose => "UsedAfterClose",
            BzsError::ValidateError(_) => "ValidateError",
            BzsError::Unexpected(_) => "Unexpected",
            BzsError::Io(_) => "Io",
        }
    }

    /// Recovers a [`BzsError`] carried inside an `io::Error` by the stream
    /// adaptors; any other error becomes [`BzsError::Io`].
    pub fn from_io(e: io::Error) -> Self {
        if e.get_ref().is_some_and(|inner| inner.is::<BzsError>()) {
            if let Some(inner) = e.into_inner() {
                if let Ok(bzs) = inner.downcast::<BzsError>() {
                    return *bzs;
                }
            }
            return BzsError::Unexpected("lost error payload");
        }
        BzsError::Io(e)
    }

    /// `true` for the three decode-integrity kinds.
    #[inline]
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            BzsError::DataError | BzsError::DataErrorMagic | BzsError::UnexpectedEof
        )
    }
}

impl fmt::Display for BzsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BzsError::ParamError => f.write_str("invalid parameter passed to libbz2"),
            BzsError::MemError => f.write_str("libbz2 failed to allocate memory"),
            BzsError::DataError => f.write_str("decompressor received corrupted source"),
            BzsError::DataErrorMagic => {
                f.write_str("decompressor received source without a valid bzip2 header")
            }
            BzsError::UnexpectedEof => f.write_str("compressed source ended unexpectedly"),
            BzsError::UsedAfterClose => f.write_str("used after closed"),
            BzsError::ValidateError(msg) => write!(f, "validate error: {msg}"),
            BzsError::Unexpected(what) => write!(f, "unexpected error: {what}"),
            BzsError::Io(e) => write!(f, "i/o error: {e}"),
        }
    }
}

impl std::error::Error for BzsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BzsError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for BzsError {
    fn from(e: io::Error) -> Self {
        BzsError::Io(e)
    }
}

/// Lets the `Read`/`Write` adaptors surface engine errors through `io::Result`.
/// An `Io` error is unwrapped; everything else is boxed so callers can
/// `downcast` back to the [`BzsError`].
impl From<BzsError> for io::Error {
    fn from(e: BzsError) -> Self {
        let kind = match &e {
            BzsError::Io(_) => None,
            err if err.is_corruption() => Some(io::ErrorKind::InvalidData),
            BzsError::ValidateError(_) | BzsError::ParamError => Some(io::ErrorKind::InvalidInput),
            BzsError::MemError => Some(io::ErrorKind::OutOfMemory),
            _ => Some(io::ErrorKind::Other),
        };
        match (e, kind) {
            (BzsError::Io(inner), _) => inner,
            (e, Some(kind)) => io::Error::new(kind, e),
            (e, None) => io::Error::other(e),
        }
    }
}
