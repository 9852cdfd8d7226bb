//! Process-wide sequence identifiers for tree nodes.
//!
//! A [`SequenceId`] names "the same logical node" independently of its string
//! id, which changes when instance expansion prefixes it. Ids are handed out
//! from a single atomic counter, so generation is safe from any thread.

use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

/// Next value handed out by [`SequenceId::next`].
static NEXT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Monotonically increasing node identity.
///
/// # Examples
///
/// ```
/// use stencil_core::sequence::SequenceId;
///
/// let first = SequenceId::next();
/// let second = SequenceId::next();
/// assert!(second > first);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SequenceId(u64);

impl SequenceId {
    /// Allocates a fresh id from the shared counter.
    pub fn next() -> Self {
        Self(NEXT_SEQUENCE.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw counter value.
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SequenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
