//! lapwatch-engine: Concurrent stopwatch tree and timeline layout
//!
//! This crate provides the headless core of lapwatch, including:
//! - Nested, thread-safe stopwatches with timeout cascading
//! - Flattening of a stopwatch tree into timeline snapshots
//! - Row packing of timelines for diagram layout
//! - Relation sets for lineage highlighting

pub mod clock;
pub mod layout;
pub mod relations;
pub mod thread;
pub mod timeline;
pub mod watch;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, SystemClock};
pub use layout::{collides, pack, Layout};
pub use relations::{ancestor_chain, parent_indices, relations};
pub use thread::current_thread_id;
pub use timeline::Timeline;
pub use watch::{Stopwatch, WatchError, WatchGuard, WatchState};
