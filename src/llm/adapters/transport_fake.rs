//! Fake transport for testing
//!
//! Uses fixture strings instead of real HTTP calls and records every
//! request it receives.

use crate::llm::adapters::transport_types::{AdapterError, SyncTransport};
use std::sync::Mutex;

/// A request captured by `FakeTransport`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Fake transport for testing (uses fixture strings)
#[derive(Debug)]
pub struct FakeTransport {
    /// Response body to return
    pub response_body: String,
    /// Error message to return (if set)
    pub error_message: Option<String>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl FakeTransport {
    /// Create fake transport with given response
    pub fn new(response: &str) -> Self {
        Self {
            response_body: response.to_string(),
            error_message: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create fake transport that returns a network error
    pub fn with_error(msg: &str) -> Self {
        Self {
            response_body: String::new(),
            error_message: Some(msg.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

impl SyncTransport for FakeTransport {
    fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &str,
    ) -> Result<String, AdapterError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(RecordedRequest {
                url: url.to_string(),
                headers: headers
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                body: body.to_string(),
            });
        }
        if let Some(ref msg) = self.error_message {
            return Err(AdapterError::Network(msg.clone()));
        }
        Ok(self.response_body.clone())
    }
}
