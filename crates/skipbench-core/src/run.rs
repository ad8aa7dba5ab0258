//! Run identity.

use chrono::{DateTime, Local};
use std::fmt;

/// Format of the run directory name (ISO 8601, second resolution).
pub const RUN_ID_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Identity of one harness invocation: the local time it started.
///
/// Created once and passed to everything that needs to know which run its
/// data belongs to. Two runs started in the same second share an id, and
/// therefore an output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunId {
    started_at: DateTime<Local>,
    label: String,
}

impl RunId {
    /// Run starting now.
    pub fn now() -> Self {
        Self::from_datetime(Local::now())
    }

    pub fn from_datetime(started_at: DateTime<Local>) -> Self {
        let label = started_at.format(RUN_ID_FORMAT).to_string();
        Self { started_at, label }
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    /// Directory name for this run.
    pub fn as_str(&self) -> &str {
        &self.label
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}
