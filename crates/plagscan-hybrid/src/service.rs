use anyhow::Result;
use std::cmp::Ordering;

use plagscan_core::config::Settings;
use plagscan_core::error::Error;
use plagscan_core::rank::desc_nan_last;
use plagscan_core::traits::{Embedder, LexicalSearcher, VectorSearcher};
use plagscan_core::types::{Block, BlockResult, CandidateMeta, ScoreSet};
use plagscan_core::windows::{build_windows, extend_context};
use plagscan_embed::get_default_embedder;
use plagscan_text::LexicalIndex;
use plagscan_vector::{retrieve_semantic, SemanticIndex};

use crate::combine::{combine, CombineParams};

/// Compares query documents against both reference indices.
///
/// Holds the indices, the query-side embedder and the run settings; all of
/// them are read-only after construction, so one service can serve
/// concurrent `compare` calls.
pub struct ComparisonService<L, V> where L: LexicalSearcher, V: VectorSearcher {
    settings: Settings,
    params: CombineParams,
    lexical: L,
    semantic: V,
    embedder: Box<dyn Embedder>,
}

impl<L, V> ComparisonService<L, V> where L: LexicalSearcher, V: VectorSearcher {
    /// Fails when the settings are invalid or the query embedder is not the
    /// model the semantic index was built with.
    pub fn new(settings: Settings, lexical: L, semantic: V, embedder: Box<dyn Embedder>) -> Result<Self, Error> {
        settings.validate()?;
        if embedder.model_id() != semantic.model_id() {
            return Err(Error::ModelMismatch { indexed: semantic.model_id().to_string(), query: embedder.model_id().to_string() });
        }
        if embedder.dim() != semantic.dim() {
            return Err(Error::ModelMismatch {
                indexed: format!("{} (dim {})", semantic.model_id(), semantic.dim()),
                query: format!("{} (dim {})", embedder.model_id(), embedder.dim()),
            });
        }
        let params = CombineParams::from(&settings);
        Ok(Self { settings, params, lexical, semantic, embedder })
    }

    pub fn settings(&self) -> &Settings { &self.settings }

    /// Window `text`, score every block against the references and return the
    /// suspicious ones, best `final` score first (ties by ascending block id).
    pub fn compare(&self, text: &str) -> Result<Vec<BlockResult>> {
        let text = text.trim();
        if text.is_empty() { return Ok(Vec::new()); }

        let blocks = build_windows(text, self.settings.window_size, self.settings.stride);
        tracing::debug!(blocks = blocks.len(), "query windowed");

        let mut results = Vec::new();
        for block in &blocks {
            if let Some(result) = self.compare_block(text, block)? { results.push(result); }
        }
        results.sort_by(|a, b| match desc_nan_last(a.scores.final_score, b.scores.final_score) {
            Ordering::Equal => a.block_id.cmp(&b.block_id),
            other => other,
        });
        tracing::info!(blocks = blocks.len(), suspicious = results.len(), "comparison finished");
        Ok(results)
    }

    /// Score one query block. `None` means no candidate was classified.
    pub fn compare_block(&self, full_text: &str, block: &Block) -> Result<Option<BlockResult>> {
        let top_lex = self.lexical.search(&block.text, self.settings.k_lex)?;
        let top_sem = retrieve_semantic(&block.text, &self.semantic, self.embedder.as_ref(), self.settings.k_sem)?;
        let combined = combine(&top_lex, &top_sem, &self.params);

        let Some(best) = combined.into_iter().next() else { return Ok(None) };
        let Some(match_type) = best.match_type else { return Ok(None) };

        Ok(Some(BlockResult {
            block_id: block.block_id,
            start_word: block.start_word,
            end_word: block.end_word,
            text: block.text.clone(),
            context_text: extend_context(full_text, block.start_word, block.end_word, self.settings.context_margin),
            match_type,
            best_candidate: self.candidate_meta(&best.id),
            scores: ScoreSet {
                final_score: best.score_final,
                lex_raw: best.score_lex_raw,
                sem_raw: best.score_sem_raw,
                lex_norm: best.score_lex_norm,
                sem_norm: best.score_sem_norm,
            },
        }))
    }

    // lexical table first, then semantic; both are built from the same blocks
    fn candidate_meta(&self, uid: &str) -> CandidateMeta {
        if let Some(b) = self.lexical.block(uid).or_else(|| self.semantic.block(uid)) { return CandidateMeta::from(b); }
        tracing::warn!(uid, "candidate missing from both metadata tables");
        CandidateMeta::placeholder(uid)
    }
}

impl ComparisonService<LexicalIndex, SemanticIndex> {
    /// Load both persisted indices from the configured directories and the
    /// embedder selected by `settings`.
    pub fn open(settings: Settings) -> Result<Self> {
        let lexical = LexicalIndex::load(&settings.lexical_index_dir())?;
        let semantic = SemanticIndex::load(&settings.semantic_index_dir())?;
        let embedder = get_default_embedder(&settings)?;
        tracing::info!(references = lexical.blocks().len(), model = embedder.model_id(), "indices loaded");
        Ok(Self::new(settings, lexical, semantic, embedder)?)
    }
}
