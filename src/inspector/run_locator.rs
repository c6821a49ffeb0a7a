//! Run discovery
//!
//! Runs are subdirectories named `YYYY-MM-DD-HH-MM-SS`. Anything that does
//! not parse with that format is ignored.

use crate::inspector::{io_error, Result};
use chrono::NaiveDateTime;
use std::path::Path;

/// Directory-name format of a run
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";

/// A parsed run directory name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RunTimestamp {
    // Field order matters: ordering is by parsed date first.
    parsed: NaiveDateTime,
    name: String,
}

impl RunTimestamp {
    /// Parse a directory name; `None` if it is not a run timestamp
    pub fn parse(name: &str) -> Option<Self> {
        NaiveDateTime::parse_from_str(name, TIMESTAMP_FORMAT)
            .ok()
            .map(|parsed| Self {
                parsed,
                name: name.to_string(),
            })
    }

    /// Directory name as written by the detection tool
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parsed(&self) -> NaiveDateTime {
        self.parsed
    }
}

/// Current run plus the run before it (if any)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunSelection {
    /// Run to process
    pub current: Option<String>,
    /// Run whose results are fed back as the previous attempt
    pub previous: Option<String>,
}

/// List all run timestamps under `log_root`, newest first
///
/// A missing `log_root` is an empty result, not an error.
pub fn locate_runs(log_root: &Path) -> Result<Vec<RunTimestamp>> {
    if !log_root.is_dir() {
        return Ok(Vec::new());
    }

    let entries = std::fs::read_dir(log_root).map_err(|e| io_error(log_root, e))?;
    let mut runs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| io_error(log_root, e))?;
        if !entry.path().is_dir() {
            continue;
        }
        if let Some(run) = entry.file_name().to_str().and_then(RunTimestamp::parse) {
            runs.push(run);
        }
    }

    runs.sort_by(|a, b| b.cmp(a));
    Ok(runs)
}

/// Pick the current and previous run
///
/// With an explicit override the current run is the override, used as-is.
/// The previous run is the newest discovered run strictly older than the
/// current one; an override that is not a timestamp has no previous run.
pub fn select_runs(runs: &[RunTimestamp], explicit: Option<&str>) -> RunSelection {
    match explicit {
        Some(name) => {
            let previous = RunTimestamp::parse(name).and_then(|current| {
                runs.iter()
                    .find(|run| run.parsed < current.parsed)
                    .map(|run| run.name.clone())
            });
            RunSelection {
                current: Some(name.to_string()),
                previous,
            }
        }
        None => RunSelection {
            current: runs.first().map(|run| run.name.clone()),
            previous: runs.get(1).map(|run| run.name.clone()),
        },
    }
}
