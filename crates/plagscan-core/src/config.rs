//! Configuration loader and path helpers.
//!
//! Uses Figment to merge built-in defaults + `config.toml` + `config.<env>.toml`
//! + `APP_*` env vars. `APP_K_LEX=7` overrides `k_lex`, and so on for every
//! `Settings` field.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::env;
use std::path::PathBuf;

use crate::error::Error;

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::from(Serialized::defaults(Settings::default())).merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_"));

        Ok(Self { figment })
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// Extract and validate the full run settings.
    pub fn settings(&self) -> anyhow::Result<Settings> {
        let settings: Settings = self
            .figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to extract settings: {}", e))?;
        settings.validate()?;
        Ok(settings)
    }
}

/// Immutable parameters of one comparison run and of the index build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // windows (in words)
    pub window_size: usize,
    pub stride: usize,
    pub context_margin: usize,

    // retrieval
    pub k_lex: usize,
    pub k_sem: usize,
    pub k_final: usize,

    // fusion and raw-score thresholds
    pub alpha: f32,
    pub tau_lex: f32,
    pub tau_sem: f32,
    pub delta_para: f32,
    pub min_gate: f32,

    // lexical vectorizer
    pub lex_ngram_min: usize,
    pub lex_ngram_max: usize,

    // semantic model
    pub sem_model_name: String,
    pub model_dir: Option<String>,
    pub max_seq_len: usize,
    pub embed_batch_size: usize,
    #[serde(deserialize_with = "lenient_bool")]
    pub use_fake_embeddings: bool,

    // paths
    pub data_raw_dir: String,
    pub data_processed_dir: String,
    pub data_indexes_dir: String,
    pub index_lex_dir: String,
    pub index_sem_dir: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_size: 40,
            stride: 20,
            context_margin: 10,
            k_lex: 10,
            k_sem: 10,
            k_final: 5,
            alpha: 0.6,
            tau_lex: 0.85,
            tau_sem: 0.85,
            delta_para: 0.15,
            min_gate: 0.10,
            lex_ngram_min: 1,
            lex_ngram_max: 3,
            sem_model_name: "sentence-transformers/paraphrase-multilingual-MiniLM-L12-v2".to_string(),
            model_dir: None,
            max_seq_len: 256,
            embed_batch_size: 32,
            use_fake_embeddings: false,
            data_raw_dir: "data/raw".to_string(),
            data_processed_dir: "data/processed".to_string(),
            data_indexes_dir: "data/indexes".to_string(),
            index_lex_dir: String::new(),
            index_sem_dir: String::new(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), Error> {
        if self.window_size == 0 { return Err(Error::InvalidConfig("window_size must be > 0".into())); }
        if self.stride > self.window_size {
            return Err(Error::InvalidConfig(format!("stride ({}) must not exceed window_size ({})", self.stride, self.window_size)));
        }
        if self.k_final == 0 { return Err(Error::InvalidConfig("k_final must be > 0".into())); }
        for (name, v) in [("alpha", self.alpha), ("tau_lex", self.tau_lex), ("tau_sem", self.tau_sem), ("delta_para", self.delta_para), ("min_gate", self.min_gate)] {
            if !(0.0..=1.0).contains(&v) { return Err(Error::InvalidConfig(format!("{name} must be within [0, 1], got {v}"))); }
        }
        if self.lex_ngram_min == 0 || self.lex_ngram_min > self.lex_ngram_max {
            return Err(Error::InvalidConfig(format!("invalid n-gram range {}..={}", self.lex_ngram_min, self.lex_ngram_max)));
        }
        Ok(())
    }

    pub fn lexical_index_dir(&self) -> PathBuf { index_dir_or_default(&self.index_lex_dir, &self.data_indexes_dir, "lexical") }

    pub fn semantic_index_dir(&self) -> PathBuf { index_dir_or_default(&self.index_sem_dir, &self.data_indexes_dir, "semantic") }

    pub fn raw_dir(&self) -> PathBuf { expand_path(&self.data_raw_dir) }

    pub fn processed_dir(&self) -> PathBuf { expand_path(&self.data_processed_dir) }

    /// Local directory holding the semantic model files.
    ///
    /// Falls back to `models/<last path segment of sem_model_name>`.
    pub fn model_path(&self) -> PathBuf {
        match self.model_dir.as_deref().filter(|d| !d.trim().is_empty()) {
            Some(dir) => expand_path(dir),
            None => {
                let leaf = self.sem_model_name.rsplit('/').next().unwrap_or(&self.sem_model_name);
                PathBuf::from("models").join(leaf)
            }
        }
    }
}

fn index_dir_or_default(explicit: &str, indexes_root: &str, leaf: &str) -> PathBuf {
    if explicit.trim().is_empty() { expand_path(indexes_root).join(leaf) } else { expand_path(explicit) }
}

// Env values arrive as "1"/"true"/"yes"; accept all of them.
fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Str(String),
    }
    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(i) => i != 0,
        Flag::Str(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"),
    })
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

