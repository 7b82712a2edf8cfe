//! Immutable timeline snapshots.
//!
//! A [`Timeline`] is what a [`Stopwatch`](crate::Stopwatch) looks like at the
//! moment it is flattened. The layout and relation passes work on slices of
//! these and never touch the live tree.

use std::time::Duration;

/// Snapshot of a single watch, positioned relative to the flattening root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    /// Watch name.
    pub name: String,

    /// Logical id of the thread that started the watch (0 if never started).
    pub tid: u64,

    /// Elapsed time, including time past a timeout cutoff.
    pub duration: Duration,

    /// Offset of the watch's start from the root's start.
    pub relative_start: Duration,

    /// Whether the watch was cut off instead of ending on its own.
    pub timed_out: bool,

    /// Depth below the flattening root (root is 0).
    pub nest_level: usize,

    /// Index of the parent's timeline in the same sequence, when requested.
    pub parent: Option<usize>,
}

impl Timeline {
    /// Offset of the watch's end from the root's start.
    pub fn relative_end(&self) -> Duration {
        self.relative_start + self.duration
    }

    /// Whether this timeline is the flattening root.
    pub fn is_root(&self) -> bool {
        self.nest_level == 0
    }
}
