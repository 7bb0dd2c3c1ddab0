use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use plagscan_core::error::Error;
use plagscan_core::traits::Embedder;
use plagscan_core::types::ReferenceBlock;
use plagscan_core::windows::word_count;

use crate::index::SemanticIndex;

/// Number of blocks with more words than the embedder reads.
///
/// Every word is at least one token, so these blocks are always truncated.
pub fn blocks_over_context(blocks: &[ReferenceBlock], max_len: usize) -> usize {
    blocks.iter().filter(|b| word_count(&b.text) > max_len).count()
}

/// Embed every reference block in batches of `batch_size` and assemble the index.
pub fn build_semantic_index(blocks: Vec<ReferenceBlock>, embedder: &dyn Embedder, batch_size: usize) -> Result<SemanticIndex> {
    let batch_size = batch_size.max(1);
    tracing::info!(blocks = blocks.len(), model = embedder.model_id(), "embedding reference blocks");
    let truncated = blocks_over_context(&blocks, embedder.max_len());
    if truncated > 0 {
        tracing::warn!(truncated, max_len = embedder.max_len(), "blocks exceed the encoder context and will be truncated");
    }
    let pb = ProgressBar::new(blocks.len() as u64);
    pb.set_style(ProgressStyle::default_bar().template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} blocks ({percent}%) {msg}")?.progress_chars("#>-"));

    let mut embeddings = Vec::with_capacity(blocks.len());
    for batch in blocks.chunks(batch_size) {
        let texts: Vec<String> = batch.iter().map(|b| b.text.clone()).collect();
        let vecs = embedder.embed_batch(&texts).map_err(|e| Error::Embedding(format!("{e:#}")))?;
        if vecs.len() != texts.len() {
            return Err(Error::Embedding(format!("embedder returned {} vectors for {} texts", vecs.len(), texts.len())).into());
        }
        embeddings.extend(vecs);
        pb.inc(batch.len() as u64);
    }
    pb.finish_with_message("done");

    Ok(SemanticIndex::from_parts(embeddings, blocks, embedder.model_id(), embedder.dim())?)
}
