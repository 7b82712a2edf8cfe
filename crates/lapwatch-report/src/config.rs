//! Configuration for lapwatch reports.
//!
//! Controls how timelines are labelled in the text report and in trace-event
//! documents. Every field has a default, so a partial JSON file is valid.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Report settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Category attached to every trace event.
    #[serde(default = "default_category")]
    pub category: String,

    /// Unit hint for trace viewers ("ms" or "ns").
    #[serde(default = "default_display_time_unit")]
    pub display_time_unit: String,

    /// Process id written into trace events.
    #[serde(default = "default_pid")]
    pub pid: u32,

    /// Suffix appended to timed-out lines in the text report.
    #[serde(default = "default_timeout_marker")]
    pub timeout_marker: String,

    /// Indentation repeated once per nesting level in the text report.
    #[serde(default = "default_indent")]
    pub indent: String,
}

fn default_category() -> String {
    "lapwatch".into()
}

fn default_display_time_unit() -> String {
    "ns".into()
}

fn default_pid() -> u32 {
    std::process::id()
}

fn default_timeout_marker() -> String {
    "!!".into()
}

fn default_indent() -> String {
    " ".into()
}

impl ReportConfig {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Io)
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            category: default_category(),
            display_time_unit: default_display_time_unit(),
            pid: default_pid(),
            timeout_marker: default_timeout_marker(),
            indent: default_indent(),
        }
    }
}

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading or writing config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing config JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Error serializing config to JSON.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
}
