//! Request generations for stale-response discard.
//!
//! Each load issues a new generation. A response may only be committed if
//! its generation is still the latest issued one; older responses are
//! allowed to finish and are then dropped.

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic request counter.
#[derive(Debug, Default)]
pub struct Generation {
    latest: AtomicU64,
}

impl Generation {
    /// Creates a counter with nothing issued yet.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            latest: AtomicU64::new(0),
        }
    }

    /// Issues the next generation. The first call returns 1.
    pub fn issue(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst).saturating_add(1)
    }

    /// The most recently issued generation (0 before the first issue).
    #[must_use]
    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    /// Returns `true` if `generation` is still the latest one.
    #[must_use]
    pub fn is_current(&self, generation: u64) -> bool {
        self.latest() == generation
    }
}
