//! Local causal-LM adapter
//!
//! Weights and tokenizer are loaded once when the adapter is built and
//! reused for every case. Prompts are wrapped in the family's chat-turn
//! template; only newly generated tokens are decoded.

use crate::llm::adapters::{AdapterError, LlmAdapter, LlmMessage, LlmRole};
use crate::llm::types::{CompletionRequest, ModelFamily};
use std::fmt;
use std::path::{Path, PathBuf};

/// Chat-turn template of a local model family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatTemplate {
    /// deepseek-coder-*-instruct
    DeepSeekCoder,
    /// Qwen2.5-Coder-*-Instruct (ChatML)
    Qwen,
}

const DEEPSEEK_SYSTEM: &str = "You are an AI programming assistant, utilizing the Deepseek Coder \
model, developed by Deepseek Company, and you only answer questions related to computer science. \
For politically sensitive questions, security and privacy issues, and other non-computer science \
questions, you will refuse to answer\n";

const QWEN_SYSTEM: &str = "You are Qwen, created by Alibaba Cloud. You are a helpful assistant.";

impl ChatTemplate {
    pub fn for_family(family: ModelFamily) -> Option<Self> {
        match family {
            ModelFamily::DeepSeek => Some(ChatTemplate::DeepSeekCoder),
            ModelFamily::Qwen => Some(ChatTemplate::Qwen),
            ModelFamily::Gpt4 | ModelFamily::Gpt35 => None,
        }
    }

    /// Conversation sent to the model: fixed system turn plus the prompt
    pub fn messages(self, prompt: &str) -> Vec<LlmMessage> {
        let system = match self {
            ChatTemplate::DeepSeekCoder => DEEPSEEK_SYSTEM,
            ChatTemplate::Qwen => QWEN_SYSTEM,
        };
        vec![LlmMessage::system(system), LlmMessage::user(prompt)]
    }

    /// Render the conversation with the generation prompt appended
    pub fn render(self, prompt: &str) -> String {
        let mut text = String::new();
        for message in self.messages(prompt) {
            let turn = match (self, message.role) {
                (ChatTemplate::DeepSeekCoder, LlmRole::System) => message.content,
                (ChatTemplate::DeepSeekCoder, LlmRole::User) => {
                    format!("### Instruction:\n{}\n", message.content)
                }
                (ChatTemplate::Qwen, role) => format!(
                    "<|im_start|>{}\n{}<|im_end|>\n",
                    role.as_str(),
                    message.content
                ),
            };
            text.push_str(&turn);
        }
        match self {
            ChatTemplate::DeepSeekCoder => text.push_str("### Response:"),
            ChatTemplate::Qwen => text.push_str("<|im_start|>assistant\n"),
        }
        text
    }

    /// Tokens that end the assistant turn
    pub fn stop_tokens(self) -> &'static [&'static str] {
        match self {
            ChatTemplate::DeepSeekCoder => &["<|EOT|>", "<\u{ff5c}end\u{2581}of\u{2581}sentence\u{ff5c}>"],
            ChatTemplate::Qwen => &["<|im_end|>", "<|endoftext|>"],
        }
    }
}

/// Drop the echoed prompt from a full token sequence
pub fn strip_prompt_echo(tokens: &[u32], prompt_len: usize) -> &[u32] {
    tokens.get(prompt_len..).unwrap_or(&[])
}

/// Local model adapter
pub struct LocalAdapter {
    family: ModelFamily,
    template: ChatTemplate,
    weights_dir: PathBuf,
    #[cfg(feature = "local-models")]
    engine: std::sync::Mutex<crate::llm::adapters::candle_engine::CandleEngine>,
}

impl LocalAdapter {
    /// Load weights and tokenizer from `weights_dir`
    ///
    /// Expects a Hugging Face style directory: `config.json`,
    /// `tokenizer.json` and one or more `*.safetensors` files.
    pub fn load(family: ModelFamily, weights_dir: &Path, seed: u64) -> Result<Self, AdapterError> {
        let template = ChatTemplate::for_family(family).ok_or_else(|| {
            AdapterError::Configuration(format!("{} is not a local model family", family))
        })?;
        if !weights_dir.is_dir() {
            return Err(AdapterError::Configuration(format!(
                "Model directory for {} does not exist: {}",
                family,
                weights_dir.display()
            )));
        }
        Self::load_engine(family, template, weights_dir, seed)
    }

    #[cfg(feature = "local-models")]
    fn load_engine(
        family: ModelFamily,
        template: ChatTemplate,
        weights_dir: &Path,
        seed: u64,
    ) -> Result<Self, AdapterError> {
        let engine = crate::llm::adapters::candle_engine::CandleEngine::load(family, weights_dir, seed)?;
        Ok(Self {
            family,
            template,
            weights_dir: weights_dir.to_path_buf(),
            engine: std::sync::Mutex::new(engine),
        })
    }

    #[cfg(not(feature = "local-models"))]
    fn load_engine(
        family: ModelFamily,
        _template: ChatTemplate,
        _weights_dir: &Path,
        _seed: u64,
    ) -> Result<Self, AdapterError> {
        Err(AdapterError::Configuration(format!(
            "{} needs the `local-models` feature; rebuild with --features local-models",
            family
        )))
    }
}

impl fmt::Debug for LocalAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalAdapter")
            .field("family", &self.family)
            .field("weights_dir", &self.weights_dir)
            .finish_non_exhaustive()
    }
}

impl LlmAdapter for LocalAdapter {
    #[cfg(feature = "local-models")]
    fn generate(&self, request: &CompletionRequest) -> Result<String, AdapterError> {
        let text = self.template.render(&request.prompt);
        let mut engine = self
            .engine
            .lock()
            .map_err(|_| AdapterError::LocalModel("model state poisoned".to_string()))?;
        engine.generate(
            &text,
            request.max_tokens as usize,
            request.temperature,
            self.template.stop_tokens(),
        )
    }

    #[cfg(not(feature = "local-models"))]
    fn generate(&self, _request: &CompletionRequest) -> Result<String, AdapterError> {
        Err(AdapterError::Configuration(
            "local model support not compiled in".to_string(),
        ))
    }

    fn provider_name(&self) -> &str {
        match self.family {
            ModelFamily::DeepSeek => "deepseek-local",
            _ => "qwen-local",
        }
    }
}
