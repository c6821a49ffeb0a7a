//! Transport types
//!
//! Common types shared across transport implementations.

/// Adapter errors
///
/// Every variant is fatal for the invocation: there is no retry.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// Network error (connection refused, timeout, etc.)
    #[error("Network error: {0}")]
    Network(String),

    /// HTTP error (non-2xx status)
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Rate limited or quota exhausted
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Invalid response from provider
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Local model load or generation failure
    #[error("Local model error: {0}")]
    LocalModel(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(String),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(String),
}

impl From<std::io::Error> for AdapterError {
    fn from(err: std::io::Error) -> Self {
        AdapterError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AdapterError {
    fn from(err: serde_json::Error) -> Self {
        AdapterError::Json(err.to_string())
    }
}

impl From<ureq::Error> for AdapterError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(status, response) => {
                let message = response
                    .into_string()
                    .map(|body| provider_error_message(&body).unwrap_or(body))
                    .unwrap_or_else(|_| format!("HTTP {}", status));
                match status {
                    401 => AdapterError::Authentication(message),
                    429 => AdapterError::RateLimited(message),
                    _ => AdapterError::Http { status, message },
                }
            }
            ureq::Error::Transport(err) => AdapterError::Network(err.to_string()),
        }
    }
}

/// `error.message` of an OpenAI-style error body
fn provider_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

/// Synchronous HTTP transport
///
/// Abstraction over the HTTP client so adapters can be tested with
/// `FakeTransport`.
pub trait SyncTransport: Send + Sync {
    /// POST JSON request and return response body
    fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &str,
    ) -> Result<String, AdapterError>;
}
