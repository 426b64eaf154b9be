//! Process-wide notification level and stderr display macros.
//!
//! 0 = silent, 1 = errors only, 2 = results + warnings (CLI default),
//! 3 = per-file progress, 4 = engine traces (buffer growth, stream end),
//! 5 = every native step.
//!
//! The level is a relaxed atomic; the library never writes to stderr unless
//! a caller raises it above 0.

use std::sync::atomic::{AtomicI32, Ordering};

/// Global notification level.
pub static DISPLAY_LEVEL: AtomicI32 = AtomicI32::new(0);

/// Returns the current notification level.
#[inline]
pub fn display_level() -> i32 {
    DISPLAY_LEVEL.load(Ordering::Relaxed)
}

/// Sets the notification level and returns the new value.
pub fn set_display_level(level: i32) -> i32 {
    DISPLAY_LEVEL.store(level, Ordering::Relaxed);
    level
}

/// Print to stderr unconditionally.
#[macro_export]
macro_rules! display {
    ($($arg:tt)*) => { eprint!($($arg)*) };
}

/// Print to stderr when the notification level is at least `level`.
#[macro_export]
macro_rules! displaylevel {
    ($level:expr, $($arg:tt)*) => {
        if $crate::display::display_level() >= $level {
            eprint!($($arg)*);
        }
    };
}
