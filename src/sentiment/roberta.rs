//! RoBERTa sequence classifier for sentiment.
//!
//! Uses `candle_transformers::models::xlm_roberta`, whose sequence classification head
//! matches the `roberta.*` / `classifier.*` layout of RoBERTa sentiment checkpoints.

use anyhow::{Context, Error as E};
use candle_core::{DType, Device, Tensor, D};
use candle_nn::{ops::softmax, VarBuilder};
use candle_transformers::models::xlm_roberta::{
    Config as RobertaConfig, XLMRobertaForSequenceClassification,
};
use hf_hub::api::sync::{Api, ApiRepo};
use hf_hub::{Repo, RepoType};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tokenizers::models::bpe::BPE;
use tokenizers::pre_tokenizers::byte_level::ByteLevel;
use tokenizers::processors::roberta::RobertaProcessing;
use tokenizers::Tokenizer;

use super::{Prediction, Sentiment, SentimentClassifier};
use crate::config::ModelConfig;
use crate::{Result, SentimentToolError};

/// RoBERTa reserves positions for the padding offset
const POSITION_OFFSET: usize = 2;

#[derive(Deserialize)]
struct ClassifierConfigJson {
    #[serde(default)]
    id2label: HashMap<String, String>,
    max_position_embeddings: usize,
}

/// Sentiment model loaded from the Hugging Face Hub
pub struct RobertaSentimentModel {
    model: XLMRobertaForSequenceClassification,
    tokenizer: Tokenizer,
    id2label: HashMap<u32, Sentiment>,
    max_tokens: usize,
    eos_token_id: u32,
    device: Device,
    model_id: String,
}

impl RobertaSentimentModel {
    /// Download (or reuse cached) weights and tokenizer and build the model
    pub fn load(config: &ModelConfig) -> Result<Self> {
        let device = if config.use_gpu {
            Device::cuda_if_available(0)?
        } else {
            Device::Cpu
        };

        Self::load_on(config, device).map_err(|e| {
            SentimentToolError::ModelLoadFailed(format!("{}: {:#}", config.model_id, e)).into()
        })
    }

    fn load_on(config: &ModelConfig, device: Device) -> Result<Self> {
        tracing::info!(
            "Loading sentiment model {} (revision {})",
            config.model_id,
            config.revision
        );

        let api = Api::new()?;
        let repo = api.repo(Repo::with_revision(
            config.model_id.clone(),
            RepoType::Model,
            config.revision.clone(),
        ));

        let config_path = repo.get("config.json")?;
        let config_str = fs_err::read_to_string(&config_path)?;
        let class_cfg: ClassifierConfigJson =
            serde_json::from_str(&config_str).context("Failed to parse model config")?;
        let model_cfg = parse_model_config(&config_str)?;

        let id2label = class_cfg
            .id2label
            .iter()
            .map(|(id, label)| -> Result<(u32, Sentiment)> {
                let id: u32 = id
                    .parse()
                    .with_context(|| format!("Invalid id2label key '{}'", id))?;
                Ok((id, Sentiment::from_label(label)?))
            })
            .collect::<Result<HashMap<_, _>>>()?;

        if id2label.is_empty() {
            anyhow::bail!("Model config has no id2label mapping");
        }

        let weights_path = repo
            .get("model.safetensors")
            .or_else(|_| repo.get("pytorch_model.bin"))?;

        let vb = if weights_path.extension().is_some_and(|e| e == "safetensors") {
            unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device)? }
        } else {
            VarBuilder::from_pth(&weights_path, DType::F32, &device)?
        };

        let model = XLMRobertaForSequenceClassification::new(id2label.len(), &model_cfg, vb)?;
        let tokenizer = load_tokenizer(&repo)?;
        let eos_token_id = tokenizer.token_to_id("</s>").unwrap_or(2);

        Ok(Self {
            model,
            tokenizer,
            id2label,
            max_tokens: class_cfg
                .max_position_embeddings
                .saturating_sub(POSITION_OFFSET),
            eos_token_id,
            device,
            model_id: config.model_id.clone(),
        })
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    fn encode(&self, text: &str) -> Result<(Vec<u32>, Vec<u32>)> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| E::msg(format!("Tokenization error: {e}")))?;

        Ok(truncate_encoding(
            encoding.get_ids().to_vec(),
            encoding.get_attention_mask().to_vec(),
            self.max_tokens,
            self.eos_token_id,
        ))
    }
}

impl SentimentClassifier for RobertaSentimentModel {
    fn classify(&self, text: &str) -> Result<Prediction> {
        let (ids, mask) = self.encode(text)?;

        let input_ids = Tensor::new(ids.as_slice(), &self.device)?.unsqueeze(0)?;
        let attention_mask = Tensor::new(mask.as_slice(), &self.device)?.unsqueeze(0)?;
        let token_type_ids = input_ids.zeros_like()?;

        let logits = self
            .model
            .forward(&input_ids, &attention_mask, &token_type_ids)?;
        let pred_id = logits.argmax(D::Minus1)?.squeeze(0)?.to_scalar::<u32>()?;

        let probs = softmax(&logits, D::Minus1)?;
        let probs_vec = probs.squeeze(0)?.to_vec1::<f32>()?;
        let score = probs_vec.get(pred_id as usize).copied().unwrap_or(0.0);

        let sentiment = *self
            .id2label
            .get(&pred_id)
            .ok_or_else(|| E::msg(format!("Predicted ID '{pred_id}' not in id2label")))?;

        tracing::trace!("{} ({:.3}): {}", sentiment, score, text);

        Ok(Prediction { sentiment, score })
    }
}

/// Cut ids and mask to `max_tokens`, keeping the sequence terminated by `eos`
fn truncate_encoding(
    mut ids: Vec<u32>,
    mut mask: Vec<u32>,
    max_tokens: usize,
    eos: u32,
) -> (Vec<u32>, Vec<u32>) {
    if ids.len() > max_tokens {
        tracing::warn!("Input of {} tokens truncated to {}", ids.len(), max_tokens);
        ids.truncate(max_tokens);
        mask.truncate(max_tokens);
        if let Some(last) = ids.last_mut() {
            *last = eos;
        }
    }

    (ids, mask)
}

/// Parse the backbone config, filling keys that older checkpoints omit
fn parse_model_config(config_str: &str) -> Result<RobertaConfig> {
    let mut value: Value = serde_json::from_str(config_str)?;

    if let Some(object) = value.as_object_mut() {
        object
            .entry("position_embedding_type")
            .or_insert_with(|| Value::from("absolute"));
        object
            .entry("pad_token_id")
            .or_insert_with(|| Value::from(1));
    }

    serde_json::from_value(value).context("Failed to parse RoBERTa config")
}

fn load_tokenizer(repo: &ApiRepo) -> Result<Tokenizer> {
    if let Ok(path) = repo.get("tokenizer.json") {
        return Tokenizer::from_file(path)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {e}"));
    }

    tracing::debug!("No tokenizer.json in repo, assembling BPE tokenizer from vocab and merges");
    let vocab = repo.get("vocab.json")?;
    let merges = repo.get("merges.txt")?;
    byte_level_bpe(&vocab, &merges)
}

/// RoBERTa-style byte-level BPE tokenizer from raw vocab/merges files
fn byte_level_bpe(vocab: &Path, merges: &Path) -> Result<Tokenizer> {
    let bpe = BPE::from_file(&vocab.to_string_lossy(), &merges.to_string_lossy())
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build BPE model: {e}"))?;

    let mut tokenizer = Tokenizer::new(bpe);
    tokenizer
        .with_pre_tokenizer(ByteLevel::new(false, true, true))
        .with_post_processor(RobertaProcessing::default())
        .with_decoder(ByteLevel::default());

    Ok(tokenizer)
}
