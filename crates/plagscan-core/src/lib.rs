//! Shared types, configuration and text windowing for the plagscan crates.

pub mod config;
pub mod data_processor;
pub mod error;
pub mod rank;
pub mod traits;
pub mod types;
pub mod windows;

pub use config::{Config, Settings};
pub use error::{Error, Result};
pub use types::{Block, BlockResult, CandidateMeta, MatchType, ReferenceBlock, ScoreSet, SearchHit, SourceKind};
pub use windows::{build_windows, extend_context};
