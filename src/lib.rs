//! nio-fixer: LLM-assisted repair of non-idempotent JVM tests
//!
//! Reads the per-test evidence a detection run left under `.NIOInspector/`,
//! asks a hosted or local language model for a fix (or for the next
//! exploration step) and writes the answer back next to the evidence.

pub mod cli;
pub mod config;
pub mod fixer;
pub mod inspector;
pub mod llm;

// Re-export the pipeline entry points
pub use config::FixerConfig;
pub use fixer::{
    generate_compilable_patch, prepare_run, process_run, run_fixer, CompilePatchOptions,
    FixerError, FixerOptions, FixerSummary, PreparedRun,
};

// Re-export inspector layout
pub use inspector::{InspectorError, LOG_DIRECTORY, MANIFEST_FILE};

// Re-export LLM layer
pub use llm::{create_adapter, Adapter, AdapterError, LlmAdapter, Mode, ModelFamily};
