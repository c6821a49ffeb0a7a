//! OpenAI response parsing
//!
//! Public functions for parsing chat-completion JSON.

use crate::llm::adapters::AdapterError;
use serde_json::Value as JsonValue;

/// Parse OpenAI chat completion JSON response
///
/// Returns `choices[0].message.content`. A body carrying an `error` object
/// is reported with the provider's message.
pub fn parse_chat_completion(response: &str) -> Result<String, AdapterError> {
    let json: JsonValue = serde_json::from_str(response)?;

    if let Some(error) = json.get("error") {
        let message = error
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("unknown provider error");
        return Err(AdapterError::InvalidResponse(message.to_string()));
    }

    let content = json["choices"]
        .get(0)
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .ok_or_else(|| {
            AdapterError::InvalidResponse("Missing choices[0].message.content".to_string())
        })?;

    Ok(content.to_string())
}
