use anyhow::Result;

use plagscan_core::config::Settings;
use plagscan_core::data_processor::{DataProcessor, WindowConfig};
use plagscan_core::traits::Embedder;
use plagscan_core::types::ReferenceBlock;
use plagscan_text::LexicalIndex;
use plagscan_vector::{build_semantic_index, SemanticIndex};

/// Build both indices over the same reference blocks, so their metadata
/// tables agree row for row.
pub fn build_indices(blocks: Vec<ReferenceBlock>, embedder: &dyn Embedder, settings: &Settings) -> Result<(LexicalIndex, SemanticIndex)> {
    anyhow::ensure!(!blocks.is_empty(), "no reference blocks to index");
    let lexical = LexicalIndex::build(blocks.clone(), settings.lex_ngram_min, settings.lex_ngram_max)?;
    let semantic = build_semantic_index(blocks, embedder, settings.embed_batch_size)?;
    Ok((lexical, semantic))
}

/// Load the corpus from the configured directories, window it, build both
/// indices and persist them.
pub fn index_corpus(settings: &Settings, embedder: &dyn Embedder) -> Result<(LexicalIndex, SemanticIndex)> {
    let processor = DataProcessor::new(WindowConfig { window_size: settings.window_size, stride: settings.stride });
    let processed = settings.processed_dir();
    let corpus = processor.load_corpus(&settings.raw_dir(), Some(processed.as_path()))?;
    let blocks = processor.reference_blocks(&corpus);

    let (lexical, semantic) = build_indices(blocks, embedder, settings)?;
    let lex_dir = settings.lexical_index_dir();
    let sem_dir = settings.semantic_index_dir();
    lexical.save(&lex_dir)?;
    semantic.save(&sem_dir)?;
    tracing::info!(lexical = %lex_dir.display(), semantic = %sem_dir.display(), "indices saved");
    Ok((lexical, semantic))
}
