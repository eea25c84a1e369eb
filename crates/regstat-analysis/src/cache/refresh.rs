//! Single-flight guard for full cache refreshes.

use std::sync::atomic::{AtomicBool, Ordering};

/// Result of a refresh request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Completed,
    /// Another refresh was already running; this request was dropped.
    Skipped,
}

/// Held for the duration of one refresh. Dropping it releases the flag,
/// including on early return or panic.
pub struct RefreshGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> RefreshGuard<'a> {
    /// Claim the flag, or `None` when a refresh is in flight.
    pub fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}
