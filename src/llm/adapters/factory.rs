//! Adapter Factory
//!
//! Creates the backend adapter for a model family from configuration.

use crate::config::FixerConfig;
use crate::llm::adapters::local::LocalAdapter;
use crate::llm::adapters::openai::OpenAiAdapter;
use crate::llm::adapters::transport::{Transport, UreqTransport};
use crate::llm::adapters::{Adapter, AdapterError};
use crate::llm::types::ModelFamily;
use tracing::debug;

/// Create the adapter for `family`
///
/// Hosted families need `api_key` (an `env:NAME` reference is read from
/// the environment). Local families load their weights from the directory
/// configured under `[local]`; this happens once per process.
pub fn create_adapter(
    family: ModelFamily,
    api_key: Option<&str>,
    config: &FixerConfig,
) -> Result<Adapter, AdapterError> {
    if let Some(model) = family.hosted_model_name() {
        let api_key = api_key.ok_or_else(|| {
            AdapterError::Configuration(format!("API key is required for {} models.", family))
        })?;
        let api_key = resolve_env_var(api_key)?;
        debug!(%family, base_url = %config.openai.base_url, "creating hosted adapter");

        let transport = Transport::Real(UreqTransport::with_timeout(config.openai.timeout_secs));
        return Ok(Adapter::OpenAi(OpenAiAdapter::with_transport(
            config.openai.base_url.clone(),
            model.to_string(),
            api_key,
            transport,
        )));
    }

    let weights_dir = config.local.weights_dir(family).ok_or_else(|| {
        AdapterError::Configuration(format!(
            "No model directory configured for {}; set it in fixer.toml under [local]",
            family
        ))
    })?;
    debug!(%family, dir = %weights_dir.display(), "creating local adapter");
    let adapter = LocalAdapter::load(family, weights_dir, config.local.seed)?;
    Ok(Adapter::Local(Box::new(adapter)))
}

/// Resolve environment variable reference
///
/// If value starts with "env:", read from environment.
/// Otherwise return value as-is.
pub fn resolve_env_var(value: &str) -> Result<String, AdapterError> {
    match value.strip_prefix("env:") {
        Some(name) => std::env::var(name).map_err(|_| {
            AdapterError::Configuration(format!("Environment variable {} is not set", name))
        }),
        None => Ok(value.to_string()),
    }
}
