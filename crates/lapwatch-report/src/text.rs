//! Plain-text timeline report.
//!
//! A header naming the root and its wall-clock start, then one line per
//! timeline, indented by nesting level:
//!
//! ```text
//! main @ 2026-10-15T08:00:00Z
//! main [500ms @0ms]
//!  a [125ms @0ms]
//!  b [375ms @125ms]!!
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use lapwatch_engine::Timeline;

use crate::config::ReportConfig;

/// Header line naming the root and when it started.
pub fn header(root: &str, started_at: DateTime<Utc>) -> String {
    format!(
        "{root} @ {}",
        started_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    )
}

/// Format a single timeline.
pub fn line(timeline: &Timeline, config: &ReportConfig) -> String {
    format!(
        "{}{} [{}ms @{}ms]{}",
        config.indent.repeat(timeline.nest_level),
        timeline.name,
        timeline.duration.as_millis(),
        timeline.relative_start.as_millis(),
        if timeline.timed_out {
            config.timeout_marker.as_str()
        } else {
            ""
        }
    )
}

/// Format every timeline, one per line.
pub fn render(timelines: &[Timeline], config: &ReportConfig) -> String {
    timelines
        .iter()
        .map(|timeline| line(timeline, config))
        .collect::<Vec<_>>()
        .join("\n")
}
