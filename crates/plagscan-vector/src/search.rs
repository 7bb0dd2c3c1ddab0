use plagscan_core::error::Error;
use plagscan_core::rank::{dot, top_k_stable};
use plagscan_core::traits::{Embedder, VectorSearcher};
use plagscan_core::types::SearchHit;

use crate::index::SemanticIndex;

impl SemanticIndex {
    /// Exact top-`k` by cosine (dot product of unit vectors), best first.
    pub fn top_k(&self, query_vec: &[f32], k: usize) -> Vec<SearchHit> {
        let scores: Vec<f32> = self.embeddings.iter().map(|row| dot(query_vec, row)).collect();
        top_k_stable(&scores, k)
            .into_iter()
            .map(|i| SearchHit::semantic(self.blocks()[i].uid.clone(), scores[i]))
            .collect()
    }
}

/// Embed `block_text` and return the `k` most similar reference blocks.
///
/// Empty text yields no hits and never reaches the embedder.
pub fn retrieve_semantic(block_text: &str, index: &dyn VectorSearcher, embedder: &dyn Embedder, k: usize) -> anyhow::Result<Vec<SearchHit>> {
    if block_text.trim().is_empty() || k == 0 { return Ok(Vec::new()); }
    let q_vec = embedder
        .embed_batch(&[block_text.to_string()])
        .map_err(|e| Error::Embedding(format!("{e:#}")))?
        .pop()
        .ok_or_else(|| Error::Embedding("embedder returned no vector".into()))?;
    index.search_vec(&q_vec, k)
}
