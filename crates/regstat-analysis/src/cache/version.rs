//! Monotonic data version shared by every derived cache.

use std::sync::atomic::{AtomicU64, Ordering};

/// Bumped exactly once per completed mutating operation. Cached values are
/// tagged with the version they were computed at and are stale once it
/// moves on.
#[derive(Debug, Default)]
pub struct DataVersion(AtomicU64);

impl DataVersion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    /// Advance the version; returns the new value.
    pub fn bump(&self) -> u64 {
        let next = self.0.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::debug!(version = next, "data version bumped");
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bump_is_monotonic() {
        let v = DataVersion::new();
        assert_eq!(v.current(), 0);
        assert_eq!(v.bump(), 1);
        assert_eq!(v.bump(), 2);
        assert_eq!(v.current(), 2);
    }
}
