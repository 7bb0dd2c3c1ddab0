//! plagscan-vector
//!
//! Semantic retrieval: exact cosine search over L2-normalized reference
//! embeddings, plus the batch writer that builds the index from an embedder.

pub mod index;
pub mod search;
pub mod writer;

pub use index::SemanticIndex;
pub use search::retrieve_semantic;
pub use writer::{blocks_over_context, build_semantic_index};
