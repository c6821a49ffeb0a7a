//! OpenAI Adapter
//!
//! Hosted chat-completion API. One non-streaming request per call, no
//! retry.

use crate::llm::adapters::transport::{SyncTransport, Transport, UreqTransport};
use crate::llm::adapters::{AdapterError, LlmAdapter, LlmMessage};
use crate::llm::types::CompletionRequest;

pub use crate::llm::adapters::openai_parse::parse_chat_completion;

/// Default API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI-compatible adapter
#[derive(Debug)]
pub struct OpenAiAdapter {
    /// Base URL (e.g., https://api.openai.com/v1)
    base_url: String,
    /// Model name (e.g., gpt-4)
    model: String,
    /// API key
    api_key: String,
    /// HTTP transport
    transport: Transport,
}

impl OpenAiAdapter {
    /// Create new OpenAI adapter
    pub fn new(base_url: String, model: String, api_key: String) -> Self {
        Self::with_transport(base_url, model, api_key, Transport::Real(UreqTransport::new()))
    }

    /// Create adapter with custom transport (timeouts, testing)
    pub fn with_transport(
        base_url: String,
        model: String,
        api_key: String,
        transport: Transport,
    ) -> Self {
        Self {
            base_url,
            model,
            api_key,
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Build chat request body (single user message)
    pub fn build_request(&self, request: &CompletionRequest) -> Result<String, AdapterError> {
        let messages: Vec<_> = [LlmMessage::user(&request.prompt)]
            .iter()
            .map(|msg| {
                serde_json::json!({
                    "role": msg.role.as_str(),
                    "content": msg.content
                })
            })
            .collect();

        let body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
            "stream": false
        });

        Ok(body.to_string())
    }
}

impl LlmAdapter for OpenAiAdapter {
    fn generate(&self, request: &CompletionRequest) -> Result<String, AdapterError> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let body = self.build_request(request)?;

        let auth_header = format!("Bearer {}", self.api_key);
        let headers = [
            ("Authorization", auth_header.as_str()),
            ("Content-Type", "application/json"),
        ];

        let response = self.transport.post_json(&url, &headers, &body)?;
        parse_chat_completion(&response)
    }

    fn provider_name(&self) -> &str {
        "openai"
    }
}
