//! Logical thread identifiers.
//!
//! `std::thread::ThreadId` has no stable integer form, so each OS thread is
//! handed a small process-unique number the first time it records a mark.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static THREAD_ID: u64 = NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed);
}

/// Stable logical id of the calling thread.
pub fn current_thread_id() -> u64 {
    THREAD_ID.with(|id| *id)
}
