//! The stopwatch tree.
//!
//! A [`Stopwatch`] is a cheap, cloneable handle to a named timed interval.
//! Children are created explicitly from a parent handle and may be started,
//! ended and extended from any thread. When a root ends, every descendant
//! that is still running is cut off at the root's end time.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::clock::{Clock, SystemClock};
use crate::thread::current_thread_id;
use crate::timeline::Timeline;

/// Lifecycle of a watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WatchState {
    /// Created but not yet started.
    #[default]
    Created,
    /// Started and not yet ended.
    Running,
    /// Ended by its own `end()` call.
    Stopped,
    /// Cut off by an explicit timeout or by its root ending first.
    TimedOut,
}

impl WatchState {
    /// Whether the watch can no longer be started or stopped.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Stopped | Self::TimedOut)
    }
}

impl fmt::Display for WatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Running => write!(f, "running"),
            Self::Stopped => write!(f, "stopped"),
            Self::TimedOut => write!(f, "timed out"),
        }
    }
}

/// Errors that can occur when reading a watch tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WatchError {
    /// Timelines were requested from a watch that never started.
    #[error("watch '{name}' was never started; call start() before requesting timelines")]
    NotStarted { name: String },
}

#[derive(Debug, Default, Clone, Copy)]
struct Marks {
    state: WatchState,
    tid: u64,
    start: Option<Instant>,
    end: Option<Instant>,
    timeout: Option<Instant>,
    started_at: Option<DateTime<Utc>>,
}

impl Marks {
    fn duration(&self) -> Duration {
        let Some(start) = self.start else {
            return Duration::ZERO;
        };
        // `None` orders below any `Some`, so this picks the later of the two marks.
        match self.end.max(self.timeout) {
            Some(finish) => finish.saturating_duration_since(start),
            None => Duration::ZERO,
        }
    }
}

struct Node {
    name: String,
    parent: Option<Weak<Node>>,
    clock: Arc<dyn Clock>,
    marks: Mutex<Marks>,
    children: RwLock<Vec<Stopwatch>>,
}

/// Handle to a named, nestable timed interval.
///
/// Cloning the handle is cheap; all clones refer to the same watch. A parent
/// owns its children, while the child's link back to its parent is weak.
#[derive(Clone)]
pub struct Stopwatch {
    node: Arc<Node>,
}

impl Stopwatch {
    /// Create a root watch timed by the system clock.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_clock(name, Arc::new(SystemClock))
    }

    /// Create a root watch timed by `clock`. Children inherit the clock.
    pub fn with_clock(name: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self::from_node(name.into(), None, clock)
    }

    fn from_node(name: String, parent: Option<Weak<Node>>, clock: Arc<dyn Clock>) -> Self {
        Self {
            node: Arc::new(Node {
                name,
                parent,
                clock,
                marks: Mutex::new(Marks::default()),
                children: RwLock::new(Vec::new()),
            }),
        }
    }

    /// Create a named child and append it to this watch's children.
    ///
    /// Safe to call concurrently on the same parent. The child is not started.
    pub fn child(&self, name: impl Into<String>) -> Stopwatch {
        let child = Self::from_node(
            name.into(),
            Some(Arc::downgrade(&self.node)),
            Arc::clone(&self.node.clock),
        );
        self.node.children.write().push(child.clone());
        trace!(parent = %self.node.name, watch = %child.node.name, "Created child watch");
        child
    }

    /// Watch name.
    pub fn name(&self) -> &str {
        &self.node.name
    }

    /// Whether this watch has no parent.
    pub fn is_root(&self) -> bool {
        self.node.parent.is_none()
    }

    /// The parent watch, if this is a child and the parent is still alive.
    pub fn parent(&self) -> Option<Stopwatch> {
        self.node
            .parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(|node| Stopwatch { node })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> WatchState {
        self.node.marks.lock().state
    }

    /// Whether the watch is currently running.
    pub fn is_running(&self) -> bool {
        self.state() == WatchState::Running
    }

    /// Logical id of the thread that started the watch (0 if never started).
    pub fn tid(&self) -> u64 {
        self.node.marks.lock().tid
    }

    /// Monotonic start mark, if started.
    pub fn start_mark(&self) -> Option<Instant> {
        self.node.marks.lock().start
    }

    /// Wall-clock time at which the watch was started.
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.node.marks.lock().started_at
    }

    /// Snapshot of the current children, in creation order.
    ///
    /// Children appended after the snapshot is taken are not included.
    pub fn children(&self) -> Vec<Stopwatch> {
        self.node.children.read().clone()
    }

    /// Number of watches below this one.
    pub fn descendant_count(&self) -> usize {
        self.children()
            .iter()
            .map(|child| 1 + child.descendant_count())
            .sum()
    }

    /// Start the watch.
    ///
    /// Only a freshly created watch can start; calling this on a running or
    /// finished watch leaves its marks untouched.
    pub fn start(&self) {
        let now = self.node.clock.now();
        {
            let mut marks = self.node.marks.lock();
            if marks.state != WatchState::Created {
                return;
            }
            marks.state = WatchState::Running;
            marks.start = Some(now);
            marks.started_at = Some(Utc::now());
            marks.tid = current_thread_id();
        }
        debug!(watch = %self.node.name, "Started watch");
    }

    /// End the watch.
    ///
    /// A running watch becomes [`WatchState::Stopped`]; if it is a root, every
    /// descendant still running is timed out at this watch's end time.
    ///
    /// A watch that was already timed out keeps that state, but its timeout
    /// mark moves to now so the report shows when the work really finished.
    pub fn end(&self) {
        let now = self.node.clock.now();
        {
            let mut marks = self.node.marks.lock();
            let state = marks.state;
            match state {
                WatchState::Running => {
                    marks.state = WatchState::Stopped;
                    marks.end = Some(now);
                }
                WatchState::TimedOut => {
                    marks.timeout = Some(now);
                    drop(marks);
                    debug!(watch = %self.node.name, "Watch finished after timing out");
                    return;
                }
                WatchState::Created | WatchState::Stopped => return,
            }
        }
        debug!(watch = %self.node.name, duration = ?self.duration(), "Stopped watch");

        if self.is_root() {
            let timed_out = self.timeout_running_children(now);
            if timed_out > 0 {
                debug!(watch = %self.node.name, count = timed_out, "Timed out running descendants");
            }
        }
    }

    /// Cut the watch off at `at`. Does nothing unless the watch is running.
    pub fn timeout(&self, at: Instant) {
        self.try_timeout(at);
    }

    /// Cut the watch off at the clock's current time.
    pub fn timeout_now(&self) {
        self.try_timeout(self.node.clock.now());
    }

    fn try_timeout(&self, at: Instant) -> bool {
        let mut marks = self.node.marks.lock();
        if marks.state != WatchState::Running {
            return false;
        }
        marks.state = WatchState::TimedOut;
        marks.timeout = Some(at);
        true
    }

    /// Time out every running descendant at `cutoff`.
    ///
    /// The walk visits every branch, since a finished child may still have
    /// running children of its own. Returns how many watches were timed out.
    pub fn timeout_running_children(&self, cutoff: Instant) -> usize {
        let mut timed_out = 0;
        for child in self.children() {
            if child.try_timeout(cutoff) {
                timed_out += 1;
            }
            timed_out += child.timeout_running_children(cutoff);
        }
        timed_out
    }

    /// Elapsed time up to the later of the end and timeout marks.
    ///
    /// Zero for a watch that has not started or is still running.
    pub fn duration(&self) -> Duration {
        self.node.marks.lock().duration()
    }

    /// Start the watch and return a guard that ends it when dropped.
    pub fn guard(&self) -> WatchGuard {
        self.start();
        WatchGuard {
            watch: self.clone(),
        }
    }

    /// Time a closure. The watch ends on every exit path, including panics.
    pub fn measure<T>(&self, f: impl FnOnce(&Stopwatch) -> T) -> T {
        let _guard = self.guard();
        f(self)
    }

    /// Time a future.
    ///
    /// The watch ends when the future completes or when it is dropped before
    /// completion.
    pub async fn measure_async<F, Fut, T>(&self, f: F) -> T
    where
        F: FnOnce(Stopwatch) -> Fut,
        Fut: Future<Output = T>,
    {
        let _guard = self.guard();
        f(self.clone()).await
    }

    /// Flatten this watch and its descendants into timelines.
    ///
    /// Entries come in depth-first pre-order with siblings in creation order.
    /// Start offsets are relative to this watch's start. When
    /// `include_parent` is set, each entry records its parent's index.
    pub fn timelines(&self, include_parent: bool) -> Result<Vec<Timeline>, WatchError> {
        let Some(origin) = self.start_mark() else {
            warn!(watch = %self.node.name, "Timelines requested for a watch that never started");
            return Err(WatchError::NotStarted {
                name: self.node.name.clone(),
            });
        };

        let mut timelines = Vec::with_capacity(1 + self.descendant_count());
        self.collect_timelines(origin, 0, None, include_parent, &mut timelines);
        Ok(timelines)
    }

    fn collect_timelines(
        &self,
        origin: Instant,
        nest_level: usize,
        parent: Option<usize>,
        include_parent: bool,
        out: &mut Vec<Timeline>,
    ) {
        let marks = *self.node.marks.lock();
        let index = out.len();
        out.push(Timeline {
            name: self.node.name.clone(),
            tid: marks.tid,
            duration: marks.duration(),
            relative_start: marks
                .start
                .map_or(Duration::ZERO, |start| start.saturating_duration_since(origin)),
            timed_out: marks.state == WatchState::TimedOut,
            nest_level,
            parent: if include_parent { parent } else { None },
        });

        for child in self.children() {
            child.collect_timelines(origin, nest_level + 1, Some(index), include_parent, out);
        }
    }
}

impl fmt::Debug for Stopwatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marks = *self.node.marks.lock();
        f.debug_struct("Stopwatch")
            .field("name", &self.node.name)
            .field("state", &marks.state)
            .field("tid", &marks.tid)
            .field("duration", &marks.duration())
            .field("children", &self.node.children.read().len())
            .finish()
    }
}

/// Ends its watch when dropped.
#[must_use = "the watch ends as soon as the guard is dropped"]
pub struct WatchGuard {
    watch: Stopwatch,
}

impl WatchGuard {
    /// The guarded watch.
    pub fn watch(&self) -> &Stopwatch {
        &self.watch
    }
}

impl Drop for WatchGuard {
    fn drop(&mut self) {
        self.watch.end();
    }
}
