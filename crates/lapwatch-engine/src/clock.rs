//! Time sources for stopwatch trees.
//!
//! Every node of a tree reads time from the same [`Clock`], inherited from the
//! root. Production code uses [`SystemClock`]; tests and simulations use
//! [`ManualClock`] to place marks at exact offsets.

use std::fmt;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// A monotonic time source.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Current monotonic time.
    fn now(&self) -> Instant;
}

/// Clock backed by [`Instant::now`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
///
/// Time is expressed as an offset from an origin captured at construction.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    /// Create a clock positioned at its origin.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    /// The instant corresponding to offset zero.
    pub fn origin(&self) -> Instant {
        self.origin
    }

    /// The instant at `offset` past the origin.
    pub fn at(&self, offset: Duration) -> Instant {
        self.origin + offset
    }

    /// Current offset from the origin.
    pub fn elapsed(&self) -> Duration {
        *self.offset.lock()
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        *self.offset.lock() += by;
    }

    /// Jump to an absolute offset. Moving backwards is ignored.
    pub fn set(&self, offset: Duration) {
        let mut current = self.offset.lock();
        if offset > *current {
            *current = offset;
        }
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + *self.offset.lock()
    }
}
