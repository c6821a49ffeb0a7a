//! LLM Adapters
//!
//! Provider-agnostic interface over the hosted chat-completion API and
//! locally loaded causal language models.

pub mod factory;

/// LLM message role (universal subset across providers)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmRole {
    /// System message (sets behavior/context)
    System,
    /// User message (human input)
    User,
}

impl LlmRole {
    pub fn as_str(self) -> &'static str {
        match self {
            LlmRole::System => "system",
            LlmRole::User => "user",
        }
    }
}

/// Single LLM message (provider-agnostic)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmMessage {
    /// Message role
    pub role: LlmRole,
    /// Message content
    pub content: String,
}

impl LlmMessage {
    pub fn system(content: &str) -> Self {
        Self {
            role: LlmRole::System,
            content: content.to_string(),
        }
    }

    pub fn user(content: &str) -> Self {
        Self {
            role: LlmRole::User,
            content: content.to_string(),
        }
    }
}

#[cfg(feature = "local-models")]
pub mod candle_engine;
pub mod local;
pub mod openai;
pub mod openai_parse;
pub mod stub;
pub mod transport;
pub mod transport_fake;
pub mod transport_types;
pub mod transport_ureq;

// Re-export common types
pub use factory::{create_adapter, resolve_env_var};
pub use transport::{AdapterError, SyncTransport};

use crate::llm::types::CompletionRequest;

/// LLM adapter trait
///
/// All backends implement this trait. The fixer calls adapters through
/// this uniform interface.
pub trait LlmAdapter: Send + Sync {
    /// Generate a completion for a single user prompt (non-streaming)
    ///
    /// Returns the full response text as produced by the model.
    fn generate(&self, request: &CompletionRequest) -> Result<String, AdapterError>;

    /// Get provider name for logging
    fn provider_name(&self) -> &str;
}

/// Adapter enum, concrete type for all backends
///
/// Wraps all adapter types, implementing LlmAdapter via delegation.
#[derive(Debug)]
pub enum Adapter {
    OpenAi(openai::OpenAiAdapter),
    Local(Box<local::LocalAdapter>),
    Stub(stub::StubAdapter),
}

impl LlmAdapter for Adapter {
    fn generate(&self, request: &CompletionRequest) -> Result<String, AdapterError> {
        match self {
            Adapter::OpenAi(a) => a.generate(request),
            Adapter::Local(a) => a.generate(request),
            Adapter::Stub(a) => a.generate(request),
        }
    }

    fn provider_name(&self) -> &str {
        match self {
            Adapter::OpenAi(a) => a.provider_name(),
            Adapter::Local(a) => a.provider_name(),
            Adapter::Stub(a) => a.provider_name(),
        }
    }
}
