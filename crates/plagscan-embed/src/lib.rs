//! plagscan-embed
//!
//! Sentence embedders behind `plagscan_core::traits::Embedder`: a local
//! BERT-family encoder run with candle, and a deterministic hashing embedder
//! for offline development and tests.

use anyhow::{anyhow, Context, Result};
use std::collections::HashMap;
use std::hash::Hasher;
use std::path::{Path, PathBuf};
use std::time::Instant;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use tokenizers::Tokenizer;
use twox_hash::XxHash64;

use plagscan_core::config::Settings;
pub use plagscan_core::traits::Embedder;

pub mod device;
pub mod pool;
pub mod tokenize;

pub use pool::masked_mean_l2;

/// Mean-pooled, L2-normalized BERT encoder (MiniLM, mpnet-style checkpoints
/// exported with a BERT config).
pub struct BertEmbedder { model: BertModel, tokenizer: Tokenizer, device: Device, model_id: String, dim: usize, max_len: usize }

impl BertEmbedder {
    pub fn new(model_dir: &Path, model_id: &str, max_len: usize) -> Result<Self> {
        let device = device::select_device();
        tracing::info!(model = model_id, dir = %model_dir.display(), "loading sentence encoder");
        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer from {}: {}", tokenizer_path.display(), e))?;
        let config_path = model_dir.join("config.json");
        let config: BertConfig = serde_json::from_str(&std::fs::read_to_string(&config_path).with_context(|| format!("reading {}", config_path.display()))?)?;
        let weights = load_weights(model_dir, &device)?;
        let vb = VarBuilder::from_tensors(weights, DType::F32, &device);
        let model = BertModel::load(vb, &config)?;
        let max_len = max_len.min(config.max_position_embeddings);
        tracing::info!(model = model_id, dim = config.hidden_size, max_len, "sentence encoder loaded");
        Ok(Self { model, tokenizer, device, model_id: model_id.to_string(), dim: config.hidden_size, max_len })
    }

    pub fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        let start = Instant::now();
        let (input_ids, attention_mask) = tokenize::tokenize_on_device(&self.tokenizer, text, self.max_len, &self.device)?;
        let token_type_ids = input_ids.zeros_like()?;
        let hidden = self.model.forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
        let pooled = masked_mean_l2(&hidden, &attention_mask)?;
        let emb: Vec<f32> = pooled.to_device(&Device::Cpu)?.squeeze(0)?.to_dtype(DType::F32)?.to_vec1()?;
        anyhow::ensure!(emb.len() == self.dim, "encoder returned {} dims, expected {}", emb.len(), self.dim);
        if start.elapsed().as_millis() > 250 { tracing::debug!(ms = start.elapsed().as_millis() as u64, "slow embedding"); }
        Ok(emb)
    }
}

impl Embedder for BertEmbedder {
    fn model_id(&self) -> &str { &self.model_id }
    fn dim(&self) -> usize { self.dim }
    fn max_len(&self) -> usize { self.max_len }
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> { texts.iter().map(|t| self.embed_text(t)).collect() }
}

fn load_weights(model_dir: &Path, device: &Device) -> Result<HashMap<String, Tensor>> {
    let safetensors = model_dir.join("model.safetensors");
    if safetensors.exists() { return Ok(candle_core::safetensors::load(&safetensors, device)?); }
    let pickle = model_dir.join("pytorch_model.bin");
    if pickle.exists() {
        let tensors = candle_core::pickle::read_all(&pickle)?;
        return tensors.into_iter().map(|(k, t)| -> Result<(String, Tensor)> { Ok((k, t.to_device(device)?)) }).collect();
    }
    Err(anyhow!("No model.safetensors or pytorch_model.bin in {}", model_dir.display()))
}

/// Bag-of-words hashing embedder.
///
/// Tokens are lowercased and stripped of punctuation before hashing, so two
/// texts that differ only in case or punctuation embed identically. Used
/// when `use_fake_embeddings` is set and throughout the tests.
pub struct HashEmbedder { dim: usize, model_id: String }

impl HashEmbedder {
    pub fn new(dim: usize) -> Self { Self { dim: dim.max(1), model_id: format!("hash-embedder:d{}", dim.max(1)) } }

    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dim];
        for raw in text.split_whitespace() {
            let token: String = raw.chars().filter(|c| c.is_alphanumeric()).flat_map(char::to_lowercase).collect();
            if token.is_empty() { continue; }
            let mut hasher = XxHash64::with_seed(0);
            hasher.write(token.as_bytes());
            let h = hasher.finish();
            let idx = (h % self.dim as u64) as usize;
            let val = 0.5 + (((h >> 32) as u32) as f32) / (u32::MAX as f32);
            v[idx] += val;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt().max(1e-6);
        for x in &mut v { *x /= norm; }
        v
    }
}

impl Embedder for HashEmbedder {
    fn model_id(&self) -> &str { &self.model_id }
    fn dim(&self) -> usize { self.dim }
    fn max_len(&self) -> usize { usize::MAX }
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> { Ok(texts.iter().map(|t| self.embed_text(t)).collect()) }
}

pub const HASH_EMBEDDER_DIM: usize = 384;

/// Build the embedder selected by `settings`, once, at service start.
pub fn get_default_embedder(settings: &Settings) -> Result<Box<dyn Embedder>> {
    if settings.use_fake_embeddings {
        tracing::info!("using HashEmbedder (use_fake_embeddings)");
        return Ok(Box::new(HashEmbedder::new(HASH_EMBEDDER_DIM)));
    }
    let dir = resolve_model_dir(settings)?;
    Ok(Box::new(BertEmbedder::new(&dir, &settings.sem_model_name, settings.max_seq_len)?))
}

fn resolve_model_dir(settings: &Settings) -> Result<PathBuf> {
    let dir = settings.model_path();
    if dir.exists() { return Ok(dir); }
    Err(anyhow!("Could not locate model directory for '{}' at {} (set APP_MODEL_DIR)", settings.sem_model_name, dir.display()))
}
