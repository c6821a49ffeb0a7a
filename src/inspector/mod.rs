//! Inspector log layout, the read side of the detection tool's output
//!
//! The detection tool (NIOInspector) writes one timestamped directory per
//! rerun under `<project>/.NIOInspector/`. This module locates runs,
//! enumerates their candidate tests, loads per-test evidence and writes
//! the fixer's result artifacts back into the same layout.

mod evidence;
mod manifest;
mod result_writer;
mod run_locator;

pub use evidence::{load_evidence, Evidence, SourceContext, DEFAULT_MAX_RERUNS};
pub use manifest::{read_manifest, CaseId, Manifest};
pub use result_writer::{load_prior_attempt, write_result, PriorAttempt, ResultKind};
pub use run_locator::{locate_runs, select_runs, RunSelection, RunTimestamp};

use std::path::{Path, PathBuf};

/// Root log directory name written by the detection tool
pub const LOG_DIRECTORY: &str = ".NIOInspector";

/// Manifest listing candidate tests of one run
pub const MANIFEST_FILE: &str = "possible-NIO-list.txt";

/// Inspector layout errors
#[derive(Debug, thiserror::Error)]
pub enum InspectorError {
    #[error("possible-NIO-list.txt does not exist in the current run directory: {}", .0.display())]
    MissingManifest(PathBuf),

    #[error("Missing required evidence '{file}' for {case}")]
    MissingEvidence { case: String, file: &'static str },

    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for inspector operations
pub type Result<T> = std::result::Result<T, InspectorError>;

/// `<project_root>/.NIOInspector`
pub fn log_root(project_root: &Path) -> PathBuf {
    project_root.join(LOG_DIRECTORY)
}

pub(crate) fn io_error(path: &Path, source: std::io::Error) -> InspectorError {
    InspectorError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Read a file if it exists; `Ok(None)` when it does not
pub(crate) fn read_optional(path: &Path) -> Result<Option<String>> {
    if !path.is_file() {
        return Ok(None);
    }
    std::fs::read_to_string(path)
        .map(Some)
        .map_err(|e| io_error(path, e))
}
