//! plagscan-hybrid
//!
//! Fuses lexical and semantic retrieval per query block, classifies the best
//! candidate and assembles the suspicious-block report.

pub mod build;
pub mod combine;
pub mod merge;
pub mod service;

pub use build::{build_indices, index_corpus};
pub use combine::{classify, combine, normalize_scores, Candidate, CombineParams};
pub use merge::{highlight_segments, merge_intervals, Interval, Segment};
pub use service::ComparisonService;
