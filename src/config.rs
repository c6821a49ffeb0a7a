//! Fixer configuration
//!
//! Optional TOML file, by default `<project>/.NIOInspector/fixer.toml`:
//!
//! ```toml
//! [openai]
//! base_url = "https://api.openai.com/v1"
//! timeout_secs = 600
//!
//! [local]
//! deepseek_dir = "/models/deepseek-coder-33b-instruct"
//! qwen_dir = "/models/Qwen2.5-Coder-32B-Instruct"
//! seed = 299792458
//! ```
//!
//! Environment overrides (highest priority):
//! `NIO_FIXER_OPENAI_BASE_URL`, `NIO_FIXER_DEEPSEEK_DIR`, `NIO_FIXER_QWEN_DIR`.

use crate::inspector::LOG_DIRECTORY;
use crate::llm::adapters::openai::DEFAULT_BASE_URL;
use crate::llm::adapters::transport_ureq::DEFAULT_TIMEOUT_SECS;
use crate::llm::types::ModelFamily;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default config file name inside the log directory
pub const CONFIG_FILE: &str = "fixer.toml";

pub const ENV_OPENAI_BASE_URL: &str = "NIO_FIXER_OPENAI_BASE_URL";
pub const ENV_DEEPSEEK_DIR: &str = "NIO_FIXER_DEEPSEEK_DIR";
pub const ENV_QWEN_DIR: &str = "NIO_FIXER_QWEN_DIR";

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    pub deepseek_dir: Option<PathBuf>,
    pub qwen_dir: Option<PathBuf>,
    /// Sampling seed
    pub seed: u64,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            deepseek_dir: None,
            qwen_dir: None,
            seed: 299_792_458,
        }
    }
}

impl LocalConfig {
    /// Weights directory configured for `family`
    pub fn weights_dir(&self, family: ModelFamily) -> Option<&Path> {
        match family {
            ModelFamily::DeepSeek => self.deepseek_dir.as_deref(),
            ModelFamily::Qwen => self.qwen_dir.as_deref(),
            ModelFamily::Gpt4 | ModelFamily::Gpt35 => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FixerConfig {
    pub openai: OpenAiConfig,
    pub local: LocalConfig,
}

impl FixerConfig {
    /// Load configuration
    ///
    /// An explicit path must exist. Without one, the default file under
    /// the project's log directory is used when present.
    pub fn load(explicit: Option<&Path>, project_root: &Path) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) if !path.is_file() => {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Some(path) => path.to_path_buf(),
            None => {
                let default_path = project_root.join(LOG_DIRECTORY).join(CONFIG_FILE);
                if !default_path.is_file() {
                    return Ok(Self::default());
                }
                default_path
            }
        };

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::Parse { path, source })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Apply environment overrides; `lookup` is `std::env::var` in production
    pub fn apply_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(ENV_OPENAI_BASE_URL) {
            self.openai.base_url = base_url;
        }
        if let Some(dir) = lookup(ENV_DEEPSEEK_DIR) {
            self.local.deepseek_dir = Some(PathBuf::from(dir));
        }
        if let Some(dir) = lookup(ENV_QWEN_DIR) {
            self.local.qwen_dir = Some(PathBuf::from(dir));
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_file() {
        let temp = TempDir::new().unwrap();
        let config = FixerConfig::load(None, temp.path()).unwrap();
        assert_eq!(config, FixerConfig::default());
        assert_eq!(config.openai.base_url, "https://api.openai.com/v1");
        assert!(config.local.qwen_dir.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = FixerConfig::from_toml_str(
            r#"[local]
qwen_dir = "/models/qwen"
"#,
        )
        .unwrap();
        assert_eq!(config.local.qwen_dir, Some(PathBuf::from("/models/qwen")));
        assert_eq!(config.local.seed, 299_792_458);
        assert_eq!(config.openai.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_default_file_location() {
        let temp = TempDir::new().unwrap();
        let log_dir = temp.path().join(LOG_DIRECTORY);
        fs::create_dir(&log_dir).unwrap();
        fs::write(
            log_dir.join(CONFIG_FILE),
            "[openai]\nbase_url = \"http://localhost:8080/v1\"\n",
        )
        .unwrap();

        let config = FixerConfig::load(None, temp.path()).unwrap();
        assert_eq!(config.openai.base_url, "http://localhost:8080/v1");
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.toml");
        let err = FixerConfig::load(Some(&missing), temp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.toml");
        fs::write(&path, "[openai\nbase_url = ").unwrap();
        let err = FixerConfig::load(Some(&path), temp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let config = FixerConfig::default().apply_env_overrides(|key| match key {
            ENV_DEEPSEEK_DIR => Some("/env/deepseek".to_string()),
            ENV_OPENAI_BASE_URL => Some("http://proxy/v1".to_string()),
            _ => None,
        });
        assert_eq!(
            config.local.weights_dir(ModelFamily::DeepSeek),
            Some(Path::new("/env/deepseek"))
        );
        assert_eq!(config.local.weights_dir(ModelFamily::Qwen), None);
        assert_eq!(config.openai.base_url, "http://proxy/v1");
    }
}
