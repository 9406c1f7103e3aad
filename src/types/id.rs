//! Identifier types for deferreds.
//!
//! Every deferred carries a [`DeferredId`] so settlement, adoption and
//! observer dispatch can be correlated in structured logs.

use core::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static DEFERRED_COUNTER: AtomicU64 = AtomicU64::new(1);

/// A unique identifier for a deferred.
///
/// Ids are allocated from a process-wide counter and are never reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeferredId(u64);

impl DeferredId {
    /// Allocates a fresh id.
    #[must_use]
    pub(crate) fn next() -> Self {
        Self(DEFERRED_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Creates a deferred ID for testing purposes.
    #[doc(hidden)]
    #[must_use]
    pub const fn new_for_test(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw counter value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for DeferredId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeferredId({})", self.0)
    }
}

impl fmt::Display for DeferredId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "D{}", self.0)
    }
}
