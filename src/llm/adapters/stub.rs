//! Stub Adapter
//!
//! Testing adapter that returns a fixed response without network calls
//! and records every request it receives.

use crate::llm::adapters::{AdapterError, LlmAdapter};
use crate::llm::types::CompletionRequest;
use std::sync::Mutex;

/// Stub adapter for testing (returns a fixed response)
#[derive(Debug)]
pub struct StubAdapter {
    /// Fake response to return
    response: String,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl StubAdapter {
    /// Create new stub adapter with default fake response
    pub fn new() -> Self {
        Self::with_response("Directly Fixable".to_string())
    }

    /// Create stub adapter with custom response
    pub fn with_response(response: String) -> Self {
        Self {
            response,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, in order
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

impl Default for StubAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl LlmAdapter for StubAdapter {
    fn generate(&self, request: &CompletionRequest) -> Result<String, AdapterError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        Ok(self.response.clone())
    }

    fn provider_name(&self) -> &str {
        "stub"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(prompt: &str) -> CompletionRequest {
        CompletionRequest {
            prompt: prompt.to_string(),
            max_tokens: 10,
            temperature: 0.0,
        }
    }

    #[test]
    fn test_stub_adapter_with_custom_response() {
        let adapter = StubAdapter::with_response("FIXED_CODE".to_string());
        assert_eq!(adapter.generate(&request("p")).unwrap(), "FIXED_CODE");
    }

    #[test]
    fn test_stub_adapter_records_requests() {
        let adapter = StubAdapter::new();
        adapter.generate(&request("first")).unwrap();
        adapter.generate(&request("second")).unwrap();

        let prompts: Vec<String> = adapter.requests().into_iter().map(|r| r.prompt).collect();
        assert_eq!(prompts, vec!["first", "second"]);
    }

    #[test]
    fn test_stub_adapter_provider_name() {
        assert_eq!(StubAdapter::new().provider_name(), "stub");
    }
}
