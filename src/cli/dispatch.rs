//! CLI command dispatch
//!
//! Loads configuration, builds the backend once and hands it to the
//! fixer pipeline or the compile-patch command. For the fixer, the run and
//! its manifest are checked before the backend is built.

use crate::cli::{Args, Command, Error, Result, EXIT_FAILURE, EXIT_SUCCESS};
use crate::config::FixerConfig;
use crate::fixer::{
    generate_compilable_patch, prepare_run, process_run, CompilePatchOptions, FixerOptions,
};
use crate::llm::adapters::{create_adapter, LlmAdapter};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Exit code wrapper for CLI operations
pub type ExitCode = i32;

/// Run the parsed command from the current directory and return exit code
///
/// Called from main() after argument parsing.
pub fn run_cli_mode(args: Args) -> ExitCode {
    let Some(command) = args.command else {
        return EXIT_SUCCESS;
    };

    let project_root = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Error: cannot determine working directory: {}", e);
            return EXIT_FAILURE;
        }
    };

    match run_command(command, &project_root) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_FAILURE
        }
    }
}

/// Run one command against `project_root`
pub fn run_command(command: Command, project_root: &Path) -> Result<()> {
    match command {
        Command::Fix {
            model,
            mode,
            api_key,
            max_tokens,
            timestamp,
            extra_prompt,
            config,
        } => {
            let config = load_config(config.as_deref(), project_root)?;
            let options = FixerOptions {
                project_root: project_root.to_path_buf(),
                model,
                mode,
                max_tokens,
                timestamp,
                extra_prompt,
            };
            let prepared = prepare_run(&options)?;

            let adapter = create_adapter(model, api_key.as_deref(), &config)?;
            debug!(provider = adapter.provider_name(), "backend ready");
            let summary = process_run(prepared, &options, &adapter)?;
            if !summary.is_complete() {
                return Err(Error::IncompleteRun(summary.skipped.len()));
            }
        }
        Command::CompilePatch {
            class_name,
            java_file,
            model,
            api_key,
            config,
        } => {
            let config = load_config(config.as_deref(), project_root)?;
            let adapter = create_adapter(model, api_key.as_deref(), &config)?;

            let options = CompilePatchOptions {
                working_dir: project_root.to_path_buf(),
                class_name,
                java_file: PathBuf::from(java_file),
                model,
            };
            generate_compilable_patch(&options, &adapter)?;
        }
    }
    Ok(())
}

/// File configuration plus environment overrides
fn load_config(explicit: Option<&str>, project_root: &Path) -> Result<FixerConfig> {
    let config = FixerConfig::load(explicit.map(Path::new), project_root)?;
    Ok(config.apply_env_overrides(|key| std::env::var(key).ok()))
}
