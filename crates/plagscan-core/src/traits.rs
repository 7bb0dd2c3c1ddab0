use crate::types::{ReferenceBlock, SearchHit};

/// Maps text to L2-normalized vectors.
pub trait Embedder: Send + Sync {
    /// Stable identifier of the model that produced the vectors.
    fn model_id(&self) -> &str;
    fn dim(&self) -> usize;
    fn max_len(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}

/// Read-only metadata table aligned with an index's rows.
pub trait ReferenceTable: Send + Sync {
    fn block(&self, uid: &str) -> Option<&ReferenceBlock>;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool { self.len() == 0 }
}

/// Term-overlap retrieval over reference blocks.
pub trait LexicalSearcher: ReferenceTable {
    fn search(&self, text: &str, k: usize) -> anyhow::Result<Vec<SearchHit>>;
}

/// Meaning-overlap retrieval over precomputed reference embeddings.
pub trait VectorSearcher: ReferenceTable {
    /// Identifier of the model the stored embeddings came from.
    fn model_id(&self) -> &str;
    fn dim(&self) -> usize;
    fn search_vec(&self, query_vec: &[f32], k: usize) -> anyhow::Result<Vec<SearchHit>>;
}
