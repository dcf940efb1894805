//! BERT-based mental-state classifier
//!
//! Loads a fine-tuned BERT sequence-classification checkpoint from the
//! Hugging Face Hub and runs inference with Candle. Loading happens once at
//! startup; any failure there is fatal for the service, so the process
//! refuses traffic rather than degrading classification silently.

use crate::classifier::{ClassificationResult, StateClassifier};
use candle_core::{DType, Device, IndexOp, Tensor, D};
use candle_nn::ops::softmax;
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use mindhaven_core::{MentalState, Result};
use std::path::PathBuf;
use std::time::Instant;
use tokenizers::Tokenizer;

/// Maximum token sequence length fed to the encoder
const MAX_SEQ_LENGTH: usize = 512;

/// Candle-backed BERT classifier over the five mental-state categories
pub struct BertStateClassifier {
    name: String,
    tokenizer: Tokenizer,
    model: BertModel,
    pooler: Linear,
    classifier: Linear,
    device: Device,
}

impl BertStateClassifier {
    /// Download and load the classification model from the Hugging Face Hub
    ///
    /// `repo_id` is the model repository (e.g. a fine-tuned
    /// `bert-sequence-classification` checkpoint); `token` authenticates the
    /// download. `device` is "cpu", "cuda" or "mps".
    pub fn load(repo_id: &str, token: &str, device: &str) -> Result<Self> {
        tracing::info!("Loading state classifier from HuggingFace: {}", repo_id);

        let api = hf_hub::api::sync::ApiBuilder::new()
            .with_token(Some(token.to_string()))
            .build()
            .map_err(|e| {
                mindhaven_core::Error::config(format!("Failed to initialize HF API: {e}"))
            })?;

        let repo = api.repo(hf_hub::Repo::model(repo_id.to_string()));

        let config_path = Self::fetch(&repo, "config.json")?;
        let tokenizer_path = Self::fetch(&repo, "tokenizer.json")?;
        let weights_path = Self::fetch(&repo, "model.safetensors")?;

        Self::from_files(repo_id, config_path, tokenizer_path, weights_path, device)
    }

    /// Load from already-downloaded model files
    pub fn from_files(
        name: &str,
        config_path: PathBuf,
        tokenizer_path: PathBuf,
        weights_path: PathBuf,
        device: &str,
    ) -> Result<Self> {
        let tokenizer = Tokenizer::from_file(&tokenizer_path).map_err(|e| {
            mindhaven_core::Error::classifier(format!("Failed to load tokenizer: {e}"))
        })?;

        let bert_config: BertConfig = serde_json::from_str(
            &std::fs::read_to_string(&config_path)
                .map_err(|e| mindhaven_core::Error::classifier(format!("Failed to read config: {e}")))?,
        )
        .map_err(|e| mindhaven_core::Error::classifier(format!("Failed to parse config: {e}")))?;

        let device = Self::create_device(device)?;

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device)
                .map_err(|e| mindhaven_core::Error::classifier(format!("Failed to load weights: {e}")))?
        };

        let model = BertModel::load(vb.pp("bert"), &bert_config)
            .map_err(|e| mindhaven_core::Error::classifier(format!("Failed to load BERT model: {e}")))?;

        // Sequence-classification head: tanh pooler over [CLS], then a
        // linear projection onto the five categories.
        let pooler = candle_nn::linear(
            bert_config.hidden_size,
            bert_config.hidden_size,
            vb.pp("bert.pooler.dense"),
        )
        .map_err(|e| mindhaven_core::Error::classifier(format!("Failed to load pooler: {e}")))?;

        let classifier = candle_nn::linear(
            bert_config.hidden_size,
            MentalState::ALL.len(),
            vb.pp("classifier"),
        )
        .map_err(|e| {
            mindhaven_core::Error::classifier(format!("Failed to load classification head: {e}"))
        })?;

        tracing::info!(
            "Successfully loaded state classifier with {} labels",
            MentalState::ALL.len()
        );

        Ok(Self {
            name: name.to_string(),
            tokenizer,
            model,
            pooler,
            classifier,
            device,
        })
    }

    fn fetch(repo: &hf_hub::api::sync::ApiRepo, filename: &str) -> Result<PathBuf> {
        tracing::debug!("Downloading {}", filename);
        repo.get(filename).map_err(|e| {
            mindhaven_core::Error::config(format!("Failed to download {filename}: {e}"))
        })
    }

    fn create_device(device: &str) -> Result<Device> {
        match device {
            "cuda" => Device::new_cuda(0).map_err(|e| {
                mindhaven_core::Error::classifier(format!("Failed to initialize CUDA: {e}"))
            }),
            "mps" => Device::new_metal(0).map_err(|e| {
                mindhaven_core::Error::classifier(format!("Failed to initialize Metal: {e}"))
            }),
            _ => Ok(Device::Cpu),
        }
    }

    /// Run the forward pass and return the class probability distribution
    fn predict(&self, text: &str) -> Result<Vec<f32>> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| mindhaven_core::Error::classifier(format!("Tokenization failed: {e}")))?;

        let input_ids = encoding.get_ids();
        let token_type_ids = encoding.get_type_ids();
        let len = input_ids.len().min(MAX_SEQ_LENGTH);

        let input_ids = Tensor::new(&input_ids[..len], &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(|e| {
                mindhaven_core::Error::classifier(format!("Failed to create input tensor: {e}"))
            })?;

        let token_type_ids = Tensor::new(&token_type_ids[..len], &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(|e| {
                mindhaven_core::Error::classifier(format!("Failed to create token type tensor: {e}"))
            })?;

        let sequence_output = self
            .model
            .forward(&input_ids, &token_type_ids, None)
            .map_err(|e| {
                mindhaven_core::Error::classifier(format!("Model forward pass failed: {e}"))
            })?;

        // [CLS] token embedding, keeping the batch dimension for the head
        let cls = sequence_output
            .i((.., 0))
            .map_err(|e| mindhaven_core::Error::classifier(format!("Failed to get CLS token: {e}")))?;

        let pooled = self
            .pooler
            .forward(&cls)
            .and_then(|t| t.tanh())
            .map_err(|e| mindhaven_core::Error::classifier(format!("Pooler failed: {e}")))?;

        let logits = self
            .classifier
            .forward(&pooled)
            .map_err(|e| mindhaven_core::Error::classifier(format!("Classification head failed: {e}")))?;

        softmax(&logits, D::Minus1)
            .and_then(|t| t.squeeze(0))
            .and_then(|t| t.to_vec1::<f32>())
            .map_err(|e| mindhaven_core::Error::classifier(format!("Softmax failed: {e}")))
    }
}

#[async_trait::async_trait]
impl StateClassifier for BertStateClassifier {
    async fn classify(&self, text: &str) -> Result<ClassificationResult> {
        let start = Instant::now();

        let probs = self.predict(text)?;

        Ok(ClassificationResult::from_probs(&probs)?
            .with_model(self.name.clone())
            .with_latency(start.elapsed().as_micros() as u64))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
