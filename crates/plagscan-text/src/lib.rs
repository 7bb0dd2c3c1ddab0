//! plagscan-text
//!
//! Lexical retrieval: a case-sensitive word n-gram TF-IDF index over
//! reference blocks, built on tantivy's tokenizer pipeline.

pub mod analyzer;
pub mod index;
pub mod vectorizer;

pub use index::LexicalIndex;
pub use vectorizer::{SparseVec, TfidfVectorizer};
