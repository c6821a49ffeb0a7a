//! Per-case evidence loading
//!
//! Layout of a case directory:
//! - `buggyTestMethod` (required)
//! - `stacktrace1..N`, `error_line1..N` (contiguous, index-aligned)
//! - `sourceCode` (optional, fix mode only)

use crate::inspector::{read_optional, InspectorError, Result};
use std::path::Path;

/// Stack traces kept per case; small to stay inside the context window
pub const DEFAULT_MAX_RERUNS: usize = 3;

const TEST_BODY_FILE: &str = "buggyTestMethod";
const SOURCE_CODE_FILE: &str = "sourceCode";
const STACKTRACE_PREFIX: &str = "stacktrace";
const ERROR_LINE_PREFIX: &str = "error_line";

/// Broader source context for the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceContext {
    /// Mode does not use source context
    NotRequested,
    /// Requested, but the inspector did not collect any
    Unavailable,
    Available(String),
}

/// Everything the prompt needs about one case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evidence {
    pub test_body: String,
    pub source: SourceContext,
    pub stacktraces: Vec<String>,
    pub error_lines: Vec<String>,
}

/// Load evidence from `case_dir`
///
/// `case_label` is only used in the missing-evidence error.
pub fn load_evidence(
    case_dir: &Path,
    case_label: &str,
    with_source: bool,
    max_reruns: usize,
) -> Result<Evidence> {
    let test_body = read_optional(&case_dir.join(TEST_BODY_FILE))?.ok_or_else(|| {
        InspectorError::MissingEvidence {
            case: case_label.to_string(),
            file: TEST_BODY_FILE,
        }
    })?;

    let source = if with_source {
        match read_optional(&case_dir.join(SOURCE_CODE_FILE))? {
            Some(code) => SourceContext::Available(code),
            None => SourceContext::Unavailable,
        }
    } else {
        SourceContext::NotRequested
    };

    Ok(Evidence {
        test_body,
        source,
        stacktraces: read_numbered(case_dir, STACKTRACE_PREFIX, max_reruns)?,
        error_lines: read_numbered(case_dir, ERROR_LINE_PREFIX, max_reruns)?,
    })
}

/// Read `<prefix>1..=max`, stopping at the first missing index
fn read_numbered(case_dir: &Path, prefix: &str, max: usize) -> Result<Vec<String>> {
    let mut contents = Vec::new();
    for n in 1..=max {
        match read_optional(&case_dir.join(format!("{}{}", prefix, n)))? {
            Some(text) => contents.push(text),
            None => break,
        }
    }
    Ok(contents)
}
