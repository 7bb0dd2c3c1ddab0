use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Malformed index at {path}: {reason}")]
    MalformedIndex { path: String, reason: String },

    #[error("Embedding model mismatch: index built with '{indexed}', query embedder is '{query}'")]
    ModelMismatch { indexed: String, query: String },

    #[error("Embedding failed: {0}")]
    Embedding(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn malformed(path: impl AsRef<std::path::Path>, reason: impl Into<String>) -> Self {
        Self::MalformedIndex { path: path.as_ref().display().to_string(), reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
