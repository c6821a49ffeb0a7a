//! LLM Integration: prompt contracts + adapter layer
//!
//! - `contracts` assembles the single user prompt from case evidence
//! - `adapters` sends it to a hosted or local backend
//! - `types` holds the closed mode/model selectors

pub mod adapters;
pub mod contracts;
pub mod types;

// Re-export main types
pub use types::{CompletionRequest, Mode, ModelFamily, Task};

// Re-export contract functions
pub use contracts::{build_compilable_patch_prompt, build_repair_prompt};

// Re-export adapters
pub use adapters::{create_adapter, transport::AdapterError, Adapter, LlmAdapter};
