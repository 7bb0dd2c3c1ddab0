use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use plagscan_core::error::{Error, Result};
use plagscan_core::rank::l2_norm;
use plagscan_core::traits::{ReferenceTable, VectorSearcher};
use plagscan_core::types::{ReferenceBlock, SearchHit};

pub const EMBEDDINGS_FILE: &str = "embeddings.json";
pub const META_FILE: &str = "meta.json";

/// Accepted deviation of a stored row's norm from 1.0.
pub const UNIT_NORM_TOLERANCE: f32 = 1e-3;

#[derive(Serialize, Deserialize)]
struct MetaFile {
    id_map: Vec<ReferenceBlock>,
    model_name: String,
    dim: usize,
}

/// L2-normalized reference embeddings, the aligned metadata table and the
/// identifier of the model that produced them.
pub struct SemanticIndex {
    pub(crate) embeddings: Vec<Vec<f32>>,
    blocks: Vec<ReferenceBlock>,
    by_uid: HashMap<String, usize>,
    model_name: String,
    dim: usize,
}

impl SemanticIndex {
    /// Assemble an index from precomputed vectors, validating shape and norms.
    pub fn from_parts(embeddings: Vec<Vec<f32>>, blocks: Vec<ReferenceBlock>, model_name: &str, dim: usize) -> Result<Self> {
        Self::validated(embeddings, blocks, model_name.to_string(), dim, Path::new("<memory>"))
    }

    fn validated(embeddings: Vec<Vec<f32>>, blocks: Vec<ReferenceBlock>, model_name: String, dim: usize, origin: &Path) -> Result<Self> {
        if embeddings.len() != blocks.len() {
            return Err(Error::malformed(origin, format!("{} embeddings but {} id_map entries", embeddings.len(), blocks.len())));
        }
        if model_name.trim().is_empty() { return Err(Error::malformed(origin, "missing model_name")); }
        for (i, row) in embeddings.iter().enumerate() {
            if row.len() != dim { return Err(Error::malformed(origin, format!("row {i} has {} dims, expected {dim}", row.len()))); }
            let norm = l2_norm(row);
            // all-zero rows come from blocks with nothing to embed and never match
            if !norm.is_finite() || (norm != 0.0 && (norm - 1.0).abs() > UNIT_NORM_TOLERANCE) {
                return Err(Error::malformed(origin, format!("row {i} is not L2-normalized (norm={norm})")));
            }
        }
        let mut by_uid = HashMap::with_capacity(blocks.len());
        for (i, b) in blocks.iter().enumerate() {
            if by_uid.insert(b.uid.clone(), i).is_some() { return Err(Error::malformed(origin, format!("duplicate uid '{}'", b.uid))); }
        }
        Ok(Self { embeddings, blocks, by_uid, model_name, dim })
    }

    pub fn model_name(&self) -> &str { &self.model_name }

    pub fn blocks(&self) -> &[ReferenceBlock] { &self.blocks }

    pub fn save(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)?;
        serde_json::to_writer(BufWriter::new(fs::File::create(dir.join(EMBEDDINGS_FILE))?), &self.embeddings)?;
        let meta = MetaFile { id_map: self.blocks.clone(), model_name: self.model_name.clone(), dim: self.dim };
        serde_json::to_writer(BufWriter::new(fs::File::create(dir.join(META_FILE))?), &meta)?;
        tracing::info!(dir = %dir.display(), blocks = self.blocks.len(), model = %self.model_name, "semantic index saved");
        Ok(())
    }

    pub fn load(dir: &Path) -> Result<Self> {
        let embeddings: Vec<Vec<f32>> = read_json(&dir.join(EMBEDDINGS_FILE))?;
        let meta: MetaFile = read_json(&dir.join(META_FILE))?;
        let index = Self::validated(embeddings, meta.id_map, meta.model_name, meta.dim, dir)?;
        tracing::info!(dir = %dir.display(), blocks = index.blocks.len(), model = %index.model_name, "semantic index loaded");
        Ok(index)
    }
}

impl ReferenceTable for SemanticIndex {
    fn block(&self, uid: &str) -> Option<&ReferenceBlock> { self.by_uid.get(uid).map(|&i| &self.blocks[i]) }
    fn len(&self) -> usize { self.blocks.len() }
}

impl VectorSearcher for SemanticIndex {
    fn model_id(&self) -> &str { &self.model_name }
    fn dim(&self) -> usize { self.dim }
    fn search_vec(&self, query_vec: &[f32], k: usize) -> anyhow::Result<Vec<SearchHit>> {
        anyhow::ensure!(query_vec.len() == self.dim, "query vector has {} dims, index has {}", query_vec.len(), self.dim);
        Ok(self.top_k(query_vec, k))
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() { return Err(Error::NotFound(path.display().to_string())); }
    let file = fs::File::open(path)?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| Error::malformed(path, e.to_string()))
}
