//! Candle inference engine for local models
//!
//! DeepSeek Coder uses the llama architecture, Qwen2.5 Coder the qwen2
//! one. Runs on the first CUDA device when available (bf16), CPU otherwise
//! (f32).

use crate::llm::adapters::local::strip_prompt_echo;
use crate::llm::adapters::AdapterError;
use crate::llm::types::ModelFamily;
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::generation::LogitsProcessor;
use candle_transformers::models::{llama, qwen2};
use std::path::{Path, PathBuf};
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

impl From<candle_core::Error> for AdapterError {
    fn from(err: candle_core::Error) -> Self {
        AdapterError::LocalModel(err.to_string())
    }
}

fn tokenizer_error(err: tokenizers::Error) -> AdapterError {
    AdapterError::LocalModel(format!("tokenizer: {}", err))
}

enum Architecture {
    Llama {
        model: llama::Llama,
        config: llama::Config,
        cache: llama::Cache,
    },
    Qwen2(qwen2::ModelForCausalLM),
}

/// Loaded weights, tokenizer and device
pub struct CandleEngine {
    architecture: Architecture,
    tokenizer: Tokenizer,
    device: Device,
    dtype: DType,
    seed: u64,
}

impl CandleEngine {
    pub fn load(family: ModelFamily, dir: &Path, seed: u64) -> Result<Self, AdapterError> {
        let device = Device::cuda_if_available(0)?;
        let dtype = if device.is_cuda() {
            DType::BF16
        } else {
            DType::F32
        };
        info!(%family, dir = %dir.display(), ?dtype, "loading local model");

        let tokenizer = Tokenizer::from_file(dir.join("tokenizer.json")).map_err(tokenizer_error)?;
        let config_json: serde_json::Value =
            serde_json::from_slice(&std::fs::read(dir.join("config.json"))?)?;
        let weights = safetensors_files(dir)?;
        // SAFETY: weight files are not modified while the process runs
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&weights, dtype, &device)? };

        let architecture = match family {
            ModelFamily::DeepSeek => {
                let config: llama::LlamaConfig =
                    serde_json::from_value(llama3_rope_scaling(config_json))?;
                let config = config.into_config(false);
                let model = llama::Llama::load(vb, &config)?;
                let cache = llama::Cache::new(true, dtype, &config, &device)?;
                Architecture::Llama {
                    model,
                    config,
                    cache,
                }
            }
            ModelFamily::Qwen => {
                let config: qwen2::Config = serde_json::from_value(config_json)?;
                Architecture::Qwen2(qwen2::ModelForCausalLM::new(&config, vb)?)
            }
            ModelFamily::Gpt4 | ModelFamily::Gpt35 => {
                return Err(AdapterError::Configuration(format!(
                    "{} is not a local model family",
                    family
                )))
            }
        };

        Ok(Self {
            architecture,
            tokenizer,
            device,
            dtype,
            seed,
        })
    }

    /// Sample up to `max_new_tokens` after `text`, stopping at any of
    /// `stop_tokens`; returns only the generated text
    pub fn generate(
        &mut self,
        text: &str,
        max_new_tokens: usize,
        temperature: f64,
        stop_tokens: &[&str],
    ) -> Result<String, AdapterError> {
        let encoding = self.tokenizer.encode(text, true).map_err(tokenizer_error)?;
        let mut tokens = encoding.get_ids().to_vec();
        let prompt_len = tokens.len();
        let stop_ids: Vec<u32> = stop_tokens
            .iter()
            .filter_map(|token| self.tokenizer.token_to_id(token))
            .collect();

        let temperature = (temperature > 0.0).then_some(temperature);
        let mut sampler = LogitsProcessor::new(self.seed, temperature, None);
        self.reset_cache()?;

        for index in 0..max_new_tokens {
            let context_size = if index > 0 { 1 } else { tokens.len() };
            let start_pos = tokens.len().saturating_sub(context_size);
            let input = Tensor::new(&tokens[start_pos..], &self.device)?.unsqueeze(0)?;

            let logits = match &mut self.architecture {
                // (batch, vocab)
                Architecture::Llama { model, cache, .. } => model.forward(&input, start_pos, cache)?,
                // (batch, 1, vocab)
                Architecture::Qwen2(model) => model.forward(&input, start_pos)?.squeeze(0)?,
            };
            let logits = logits.squeeze(0)?.to_dtype(DType::F32)?;

            let next = sampler.sample(&logits)?;
            if stop_ids.contains(&next) {
                break;
            }
            tokens.push(next);
        }

        debug!(
            prompt_tokens = prompt_len,
            generated_tokens = tokens.len() - prompt_len,
            "local generation finished"
        );
        self.tokenizer
            .decode(strip_prompt_echo(&tokens, prompt_len), true)
            .map_err(tokenizer_error)
    }

    fn reset_cache(&mut self) -> Result<(), AdapterError> {
        match &mut self.architecture {
            Architecture::Llama { config, cache, .. } => {
                *cache = llama::Cache::new(true, self.dtype, config, &self.device)?;
            }
            Architecture::Qwen2(model) => model.clear_kv_cache(),
        }
        Ok(())
    }
}

/// `*.safetensors` files of `dir`, sorted by name
fn safetensors_files(dir: &Path) -> Result<Vec<PathBuf>, AdapterError> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("safetensors"))
        .collect();
    if files.is_empty() {
        return Err(AdapterError::Configuration(format!(
            "No .safetensors weights in {}",
            dir.display()
        )));
    }
    files.sort();
    Ok(files)
}

/// Express `rope_scaling` in the only form candle's llama config reads
///
/// Linear scaling becomes llama3 scaling with both frequency factors at 1
/// and an original context of 1: every wavelength (at least 2*pi) is then
/// past the low-frequency cutoff, so every frequency is divided by
/// `factor`. Other scaling types are dropped.
fn llama3_rope_scaling(mut config: serde_json::Value) -> serde_json::Value {
    let scaling = config.get("rope_scaling");
    let kind = scaling
        .and_then(|scaling| scaling.get("rope_type").or_else(|| scaling.get("type")))
        .and_then(|kind| kind.as_str())
        .map(str::to_string);
    let factor = scaling
        .and_then(|scaling| scaling.get("factor"))
        .and_then(|factor| factor.as_f64());

    let rewritten = match (kind.as_deref(), factor) {
        (Some("llama3"), _) => return config,
        (Some("linear"), Some(factor)) => Some(serde_json::json!({
            "rope_type": "llama3",
            "factor": factor,
            "low_freq_factor": 1.0,
            "high_freq_factor": 1.0,
            "original_max_position_embeddings": 1
        })),
        _ => None,
    };

    if let Some(object) = config.as_object_mut() {
        match rewritten {
            Some(scaling) => {
                object.insert("rope_scaling".to_string(), scaling);
            }
            None => {
                if object.remove("rope_scaling").is_some_and(|v| !v.is_null()) {
                    warn!(kind = ?kind, "unsupported rope scaling ignored");
                }
            }
        }
    }
    config
}
