//! lapwatch-report: Reports for lapwatch timelines
//!
//! Turns the timelines produced by `lapwatch-engine` into:
//! - A plain-text report, headed by the root's wall-clock start, one line per interval
//! - A Chrome trace-event document
//!
//! Report settings come from [`ReportConfig`].

pub mod config;
pub mod text;
pub mod trace_event;

use lapwatch_engine::{Stopwatch, WatchError};
use thiserror::Error;
use tracing::debug;

// Re-export commonly used types
pub use config::{ConfigError, ReportConfig};
pub use trace_event::{TraceEvent, TraceEventsReport, TraceMetadata};

/// Errors that can occur when producing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The watch tree could not be flattened.
    #[error(transparent)]
    Watch(#[from] WatchError),

    /// The report could not be serialized.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Report helpers available on every [`Stopwatch`].
pub trait WatchReportExt {
    /// Text report with default settings.
    fn report(&self) -> Result<String, ReportError> {
        self.report_with(&ReportConfig::default())
    }

    /// Text report with the given settings.
    fn report_with(&self, config: &ReportConfig) -> Result<String, ReportError>;

    /// Trace-event document for the whole tree.
    fn trace_events(&self, config: &ReportConfig) -> Result<TraceEventsReport, ReportError>;
}

impl WatchReportExt for Stopwatch {
    fn report_with(&self, config: &ReportConfig) -> Result<String, ReportError> {
        let timelines = self.timelines(false)?;
        debug!(watch = %self.name(), timelines = timelines.len(), "Rendering text report");
        let body = text::render(&timelines, config);
        Ok(match self.started_at() {
            Some(started_at) => format!("{}\n{body}", text::header(self.name(), started_at)),
            None => body,
        })
    }

    fn trace_events(&self, config: &ReportConfig) -> Result<TraceEventsReport, ReportError> {
        let timelines = self.timelines(false)?;
        debug!(watch = %self.name(), timelines = timelines.len(), "Building trace events");
        let report = TraceEventsReport::from_timelines(&timelines, config);
        Ok(match self.started_at() {
            Some(recorded_at) => report.with_metadata(self.name(), recorded_at),
            None => report,
        })
    }
}
