//! Chrome Trace Event Format export.
//!
//! Every timeline becomes a complete (`"X"`) event with microsecond
//! timestamps relative to the root. The resulting document opens in
//! `chrome://tracing` or <https://ui.perfetto.dev>.
//!
//! Viewers group events by `tid`, so many concurrent tasks multiplexed onto
//! one thread are drawn on top of each other.

use std::time::Duration;

use chrono::{DateTime, Utc};
use lapwatch_engine::Timeline;
use serde::{Deserialize, Serialize};

use crate::config::ReportConfig;
use crate::ReportError;

/// Phase of a complete event (begin and duration in one record).
pub const COMPLETE_EVENT: &str = "X";

/// A single trace event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEvent {
    pub name: String,
    pub cat: String,
    pub ph: String,
    /// Start, in microseconds from the root's start.
    pub ts: u64,
    /// Duration, in microseconds.
    pub dur: u64,
    pub pid: u32,
    pub tid: u64,
}

/// Free-form metadata shown by trace viewers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceMetadata {
    /// Name of the root watch.
    pub root: String,
    /// Wall-clock time at which the root started.
    pub recorded_at: DateTime<Utc>,
}

/// A trace-event document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceEventsReport {
    pub trace_events: Vec<TraceEvent>,
    pub display_time_unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_data: Option<TraceMetadata>,
}

fn micros(duration: Duration) -> u64 {
    u64::try_from(duration.as_micros()).unwrap_or(u64::MAX)
}

impl TraceEvent {
    /// Convert a timeline into a complete event.
    pub fn from_timeline(timeline: &Timeline, config: &ReportConfig) -> Self {
        Self {
            name: timeline.name.clone(),
            cat: config.category.clone(),
            ph: COMPLETE_EVENT.to_string(),
            ts: micros(timeline.relative_start),
            dur: micros(timeline.duration),
            pid: config.pid,
            tid: timeline.tid,
        }
    }
}

impl TraceEventsReport {
    /// Build a document from timelines, ordered by timestamp.
    ///
    /// Events with equal timestamps keep their depth-first order, so a parent
    /// still precedes the children that started with it.
    pub fn from_timelines(timelines: &[Timeline], config: &ReportConfig) -> Self {
        let mut trace_events: Vec<_> = timelines
            .iter()
            .map(|timeline| TraceEvent::from_timeline(timeline, config))
            .collect();
        trace_events.sort_by_key(|event| event.ts);

        Self {
            trace_events,
            display_time_unit: config.display_time_unit.clone(),
            other_data: None,
        }
    }

    /// Attach the root name and wall-clock start.
    pub fn with_metadata(mut self, root: impl Into<String>, recorded_at: DateTime<Utc>) -> Self {
        self.other_data = Some(TraceMetadata {
            root: root.into(),
            recorded_at,
        });
        self
    }

    /// Serialize to compact JSON.
    pub fn to_json(&self) -> Result<String, ReportError> {
        serde_json::to_string(self).map_err(ReportError::Serialize)
    }

    /// Serialize to indented JSON.
    pub fn to_json_pretty(&self) -> Result<String, ReportError> {
        serde_json::to_string_pretty(self).map_err(ReportError::Serialize)
    }
}
