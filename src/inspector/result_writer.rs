//! Result artifacts inside a case directory
//!
//! Fix mode writes `patch.txt`, exploration mode writes `agent_response`.
//! The next run reads both back as the previous attempt.

use crate::inspector::{io_error, read_optional, Result};
use std::path::{Path, PathBuf};

/// Which artifact a backend response becomes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    /// Literal fixed test code
    Patch,
    /// Exploration decision
    AgentResponse,
}

impl ResultKind {
    pub fn file_name(self) -> &'static str {
        match self {
            ResultKind::Patch => "patch.txt",
            ResultKind::AgentResponse => "agent_response",
        }
    }
}

/// What the previous run suggested and the patch derived from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorAttempt {
    pub agent_response: String,
    pub patch: String,
}

/// Write `text` (trimmed) as the `kind` artifact of `case_dir`, replacing
/// any earlier content
pub fn write_result(case_dir: &Path, kind: ResultKind, text: &str) -> Result<PathBuf> {
    let path = case_dir.join(kind.file_name());
    std::fs::write(&path, text.trim()).map_err(|e| io_error(&path, e))?;
    Ok(path)
}

/// Previous attempt of a case; `None` unless both artifacts exist
pub fn load_prior_attempt(previous_case_dir: &Path) -> Result<Option<PriorAttempt>> {
    let patch = read_optional(&previous_case_dir.join(ResultKind::Patch.file_name()))?;
    let agent_response =
        read_optional(&previous_case_dir.join(ResultKind::AgentResponse.file_name()))?;

    Ok(match (agent_response, patch) {
        (Some(agent_response), Some(patch)) => Some(PriorAttempt {
            agent_response,
            patch,
        }),
        _ => None,
    })
}
