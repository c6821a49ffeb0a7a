//! LLM-facing types
//!
//! Mode and model selectors are closed enums, validated once at argument
//! parsing. Nothing downstream compares raw strings.

use crate::inspector::ResultKind;
use std::fmt;
use std::str::FromStr;

/// Operating mode of a fixer invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Emit the corrected test source
    Fix,
    /// Choose one of the five exploration actions
    DecideRelevantSourceCode,
}

impl Mode {
    /// Fix mode feeds the collected source code into the prompt
    pub fn wants_source_context(self) -> bool {
        matches!(self, Mode::Fix)
    }

    pub fn result_kind(self) -> ResultKind {
        match self {
            Mode::Fix => ResultKind::Patch,
            Mode::DecideRelevantSourceCode => ResultKind::AgentResponse,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Fix => "fix",
            Mode::DecideRelevantSourceCode => "decide_relevant_source_code",
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fix" => Ok(Mode::Fix),
            "decide_relevant_source_code" | "explore" => Ok(Mode::DecideRelevantSourceCode),
            other => Err(format!(
                "Invalid mode '{}'. Use either 'decide_relevant_source_code' or 'fix'.",
                other
            )),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a backend call is for; selects the sampling temperature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Fix / exploration prompt for a case
    Repair,
    /// Rewrite a whole test class around an existing patch
    CompilablePatch,
}

/// Supported model families
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFamily {
    Gpt4,
    Gpt35,
    DeepSeek,
    Qwen,
}

impl ModelFamily {
    pub const ALL: [ModelFamily; 4] = [
        ModelFamily::Gpt4,
        ModelFamily::Gpt35,
        ModelFamily::DeepSeek,
        ModelFamily::Qwen,
    ];

    /// CLI identifier
    pub fn as_str(self) -> &'static str {
        match self {
            ModelFamily::Gpt4 => "GPT4",
            ModelFamily::Gpt35 => "GPT3.5",
            ModelFamily::DeepSeek => "DeepSeek",
            ModelFamily::Qwen => "Qwen",
        }
    }

    /// Hosted families need an API key
    pub fn requires_api_key(self) -> bool {
        matches!(self, ModelFamily::Gpt4 | ModelFamily::Gpt35)
    }

    /// Chat-completion model name for hosted families
    pub fn hosted_model_name(self) -> Option<&'static str> {
        match self {
            ModelFamily::Gpt4 => Some("gpt-4"),
            ModelFamily::Gpt35 => Some("gpt-3.5-turbo"),
            ModelFamily::DeepSeek | ModelFamily::Qwen => None,
        }
    }

    pub fn temperature(self, task: Task) -> f64 {
        match (self, task) {
            (ModelFamily::Gpt4 | ModelFamily::Gpt35, Task::Repair) => 0.7,
            (ModelFamily::DeepSeek, Task::Repair) => 0.5,
            (ModelFamily::Gpt4 | ModelFamily::Gpt35 | ModelFamily::DeepSeek, Task::CompilablePatch) => 0.2,
            (ModelFamily::Qwen, _) => 0.6,
        }
    }
}

impl FromStr for ModelFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelFamily::ALL
            .into_iter()
            .find(|family| family.as_str() == s)
            .ok_or_else(|| format!("Unsupported model '{}'", s))
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One backend call
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    /// Upper bound on generated tokens
    pub max_tokens: u32,
    pub temperature: f64,
}
