//! Optional release of the async runtime worker around native calls.
//!
//! A native bzip2 step can run for tens of milliseconds on a 900 kB block.
//! When the caller sits on a worker of a multi-threaded tokio runtime, the
//! gate runs the step inside [`tokio::task::block_in_place`] so the runtime
//! can hand its other tasks to a fresh worker. Everywhere else (no runtime,
//! current-thread runtime, or gate disabled) the closure runs inline.

use tokio::runtime::{Handle, RuntimeFlavor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Gate {
    enabled: bool,
}

impl Gate {
    pub fn new(enabled: bool) -> Self {
        Gate { enabled }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Runs `f`, releasing the current runtime worker if possible.
    pub fn run<T>(&self, f: impl FnOnce() -> T) -> T {
        if self.enabled && on_multi_thread_worker() {
            tokio::task::block_in_place(f)
        } else {
            f()
        }
    }
}

fn on_multi_thread_worker() -> bool {
    match Handle::try_current() {
        Ok(handle) => handle.runtime_flavor() == RuntimeFlavor::MultiThread,
        Err(_) => false,
    }
}
