//! Domain types shared by the window builder, both retrievers and the combiner.

use serde::{Deserialize, Serialize};

pub type BlockUid = String;

/// A contiguous word window of a query document.
///
/// `start_word` is inclusive and `end_word` exclusive, both counted in
/// whitespace-separated words of the original text. `text` is the
/// space-joined slice and is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub block_id: usize,
    pub start_word: usize,
    pub end_word: usize,
    pub text: String,
}

/// One window of a corpus document, as stored in both index metadata tables.
///
/// - `uid`: globally unique block identifier (`"{doc_id}#{block_id}"`)
/// - `doc_id`: stable document identity (file stem)
/// - `block_id`/`start_word`/`end_word`: position within the parent document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceBlock {
    pub uid: BlockUid,
    pub doc_id: String,
    pub block_id: usize,
    pub start_word: usize,
    pub end_word: usize,
    pub text: String,
}

impl ReferenceBlock {
    pub fn uid_for(doc_id: &str, block_id: usize) -> BlockUid { format!("{doc_id}#{block_id}") }

    pub fn from_block(doc_id: &str, block: Block) -> Self {
        Self {
            uid: Self::uid_for(doc_id, block.block_id),
            doc_id: doc_id.to_string(),
            block_id: block.block_id,
            start_word: block.start_word,
            end_word: block.end_word,
            text: block.text,
        }
    }
}

/// Indicates which retriever produced a hit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SourceKind {
    Lexical,
    Semantic,
}

/// The minimal surface returned by both retrievers.
///
/// `id` matches `ReferenceBlock::uid`. `score` is the raw cosine similarity
/// on the retriever's native scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: BlockUid,
    pub score: f32,
    pub source: SourceKind,
}

impl SearchHit {
    pub fn lexical(id: impl Into<BlockUid>, score: f32) -> Self { Self { id: id.into(), score, source: SourceKind::Lexical } }
    pub fn semantic(id: impl Into<BlockUid>, score: f32) -> Self { Self { id: id.into(), score, source: SourceKind::Semantic } }
}

/// Classification of a suspicious block.
///
/// Ordering follows severity: `Paraphrase < Literal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MatchType {
    #[serde(rename = "parafrase")]
    Paraphrase,
    #[serde(rename = "plagio_literal")]
    Literal,
}

impl MatchType {
    pub fn severity(self) -> u8 {
        match self {
            MatchType::Paraphrase => 1,
            MatchType::Literal => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MatchType::Paraphrase => "parafrase",
            MatchType::Literal => "plagio_literal",
        }
    }
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.as_str()) }
}

/// Reference-block metadata attached to a report entry.
///
/// Offsets are signed so that a candidate missing from both metadata tables
/// can be reported with `-1` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateMeta {
    pub doc_id: String,
    pub block_id: i64,
    pub start_word: i64,
    pub end_word: i64,
    pub text: String,
}

impl CandidateMeta {
    pub fn placeholder(uid: &str) -> Self {
        Self { doc_id: uid.to_string(), block_id: -1, start_word: -1, end_word: -1, text: String::new() }
    }
}

impl From<&ReferenceBlock> for CandidateMeta {
    fn from(b: &ReferenceBlock) -> Self {
        Self {
            doc_id: b.doc_id.clone(),
            block_id: i64::try_from(b.block_id).unwrap_or(i64::MAX),
            start_word: i64::try_from(b.start_word).unwrap_or(i64::MAX),
            end_word: i64::try_from(b.end_word).unwrap_or(i64::MAX),
            text: b.text.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreSet {
    #[serde(rename = "final")]
    pub final_score: f32,
    pub lex_raw: f32,
    pub sem_raw: f32,
    pub lex_norm: f32,
    pub sem_norm: f32,
}

/// One suspicious block of the query document, as reported to callers.
///
/// Serialized field names are the report's wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockResult {
    pub block_id: usize,
    #[serde(rename = "inicio")]
    pub start_word: usize,
    #[serde(rename = "fim")]
    pub end_word: usize,
    #[serde(rename = "trecho")]
    pub text: String,
    #[serde(rename = "trecho_contexto")]
    pub context_text: String,
    #[serde(rename = "tipo")]
    pub match_type: MatchType,
    #[serde(rename = "melhor_candidato")]
    pub best_candidate: CandidateMeta,
    pub scores: ScoreSet,
}
