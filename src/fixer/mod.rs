//! Fixer pipeline
//!
//! One pass over a detection run: locate the run, walk its manifest, load
//! each case's evidence, build the prompt, ask the backend and write the
//! answer back into the case directory. Strictly sequential; the backend
//! handle is owned by the caller and reused for every case.

pub mod compile_patch;

pub use compile_patch::{
    extract_java_block, generate_compilable_patch, CompilePatchOptions, COMPILE_PATCH_MAX_TOKENS,
};

use crate::inspector::{
    load_evidence, load_prior_attempt, locate_runs, log_root, read_manifest, select_runs,
    write_result, CaseId, InspectorError, Manifest, DEFAULT_MAX_RERUNS,
};
use crate::llm::adapters::{AdapterError, LlmAdapter};
use crate::llm::contracts::build_repair_prompt;
use crate::llm::types::{CompletionRequest, Mode, ModelFamily, Task};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Default cap on generated tokens per case
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Fixer errors
#[derive(Debug, thiserror::Error)]
pub enum FixerError {
    #[error("Specified current_run_directory does not exist or no NIOInspector rerun logs available: {}", .0.display())]
    MissingRunDirectory(PathBuf),

    #[error(transparent)]
    Inspector(#[from] InspectorError),

    #[error("Backend error: {0}")]
    Backend(#[from] AdapterError),

    #[error("patch.txt not found at {}", .0.display())]
    MissingPatch(PathBuf),

    #[error("Java file not found at {}", .0.display())]
    JavaFileNotFound(PathBuf),

    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for fixer operations
pub type Result<T> = std::result::Result<T, FixerError>;

/// Inputs of one fixer invocation
#[derive(Debug, Clone, PartialEq)]
pub struct FixerOptions {
    /// Directory holding `.NIOInspector` (normally the working directory)
    pub project_root: PathBuf,
    pub model: ModelFamily,
    pub mode: Mode,
    pub max_tokens: u32,
    /// Run to process instead of the latest one
    pub timestamp: Option<String>,
    /// Appended verbatim to every prompt
    pub extra_prompt: String,
}

impl FixerOptions {
    pub fn new(project_root: &Path, model: ModelFamily, mode: Mode) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            model,
            mode,
            max_tokens: DEFAULT_MAX_TOKENS,
            timestamp: None,
            extra_prompt: String::new(),
        }
    }
}

/// What a fixer pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixerSummary {
    /// Run that was processed
    pub run: String,
    /// Result files written, in manifest order
    pub written: Vec<PathBuf>,
    /// Cases skipped for missing evidence
    pub skipped: Vec<String>,
}

impl FixerSummary {
    /// Every listed case produced a result
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// A located run whose manifest is open, ready for a backend
pub struct PreparedRun {
    /// Run directory name
    pub run: String,
    pub run_dir: PathBuf,
    /// Run before `run`, source of prior attempts
    pub previous_dir: Option<PathBuf>,
    manifest: Manifest,
}

/// Locate the run to process and open its manifest
///
/// Needs no backend: discovery misses (no run, missing run directory,
/// missing manifest) are reported here, before any model is loaded.
pub fn prepare_run(options: &FixerOptions) -> Result<PreparedRun> {
    let root = log_root(&options.project_root);
    let runs = locate_runs(&root)?;
    match runs.first() {
        Some(latest) => println!("Latest NIOInspector Rerun Timestamp: {}", latest.parsed()),
        None => println!("No subdirectories found."),
    }

    let selection = select_runs(&runs, options.timestamp.as_deref());
    let current = selection
        .current
        .ok_or_else(|| FixerError::MissingRunDirectory(root.clone()))?;
    let run_dir = root.join(&current);
    if !run_dir.is_dir() {
        return Err(FixerError::MissingRunDirectory(run_dir));
    }
    let manifest = read_manifest(&run_dir)?;

    Ok(PreparedRun {
        run: current,
        run_dir,
        previous_dir: selection.previous.map(|name| root.join(name)),
        manifest,
    })
}

/// Fix every case of a prepared run
///
/// A case without `buggyTestMethod` is reported and skipped. Backend
/// failures abort the pass.
pub fn process_run<A>(
    prepared: PreparedRun,
    options: &FixerOptions,
    adapter: &A,
) -> Result<FixerSummary>
where
    A: LlmAdapter + ?Sized,
{
    let PreparedRun {
        run,
        run_dir,
        previous_dir,
        manifest,
    } = prepared;
    info!(
        run = %run,
        previous = ?previous_dir,
        mode = %options.mode,
        provider = adapter.provider_name(),
        "starting fixer pass"
    );

    let mut summary = FixerSummary {
        run,
        ..FixerSummary::default()
    };

    for case in manifest {
        let case = case?;
        match fix_case(options, adapter, &case, &run_dir, previous_dir.as_deref()) {
            Ok(path) => summary.written.push(path),
            Err(FixerError::Inspector(err @ InspectorError::MissingEvidence { .. })) => {
                warn!(case = %case.directory_name, "skipping case: {}", err);
                eprintln!("Skipping {}: {}", case.directory_name, err);
                summary.skipped.push(case.directory_name);
            }
            Err(err) => return Err(err),
        }
    }

    info!(
        written = summary.written.len(),
        skipped = summary.skipped.len(),
        "fixer pass finished"
    );
    Ok(summary)
}

/// Run the fixer over one detection run
///
/// `prepare_run` followed by `process_run`.
pub fn run_fixer<A>(options: &FixerOptions, adapter: &A) -> Result<FixerSummary>
where
    A: LlmAdapter + ?Sized,
{
    let prepared = prepare_run(options)?;
    process_run(prepared, options, adapter)
}

/// Process one case; returns the written result file
fn fix_case<A>(
    options: &FixerOptions,
    adapter: &A,
    case: &CaseId,
    run_dir: &Path,
    previous_run_dir: Option<&Path>,
) -> Result<PathBuf>
where
    A: LlmAdapter + ?Sized,
{
    let case_dir = case.directory_in(run_dir);
    let evidence = load_evidence(
        &case_dir,
        &case.directory_name,
        options.mode.wants_source_context(),
        DEFAULT_MAX_RERUNS,
    )?;
    let prior = match previous_run_dir {
        Some(dir) => load_prior_attempt(&case.directory_in(dir))?,
        None => None,
    };
    debug!(
        case = %case.directory_name,
        reruns = evidence.stacktraces.len(),
        has_prior = prior.is_some(),
        "evidence loaded"
    );

    let request = CompletionRequest {
        prompt: build_repair_prompt(
            &case.test_name,
            &evidence,
            prior.as_ref(),
            options.mode,
            &options.extra_prompt,
        ),
        max_tokens: options.max_tokens,
        temperature: options.model.temperature(Task::Repair),
    };

    let response = adapter.generate(&request)?;
    println!("{}", response);

    let path = write_result(&case_dir, options.mode.result_kind(), &response)?;
    info!(case = %case.directory_name, path = %path.display(), "result written");
    Ok(path)
}
