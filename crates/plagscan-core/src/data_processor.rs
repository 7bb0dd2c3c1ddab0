use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::types::ReferenceBlock;
use crate::windows::build_windows;

/// One corpus document as read from disk.
#[derive(Debug, Clone)]
pub struct CorpusDocument {
    pub doc_id: String,
    pub path: PathBuf,
    pub text: String,
}

#[derive(Debug, Clone, Copy)]
pub struct WindowConfig {
    pub window_size: usize,
    pub stride: usize,
}

impl Default for WindowConfig {
    fn default() -> Self { Self { window_size: 40, stride: 20 } }
}

#[derive(Default)]
pub struct DataProcessor {
    window_config: WindowConfig,
}

impl DataProcessor {
    pub fn new(window_config: WindowConfig) -> Self { Self { window_config } }

    /// Load the corpus, preferring `processed_dir` when it exists and holds
    /// at least one entry, otherwise `raw_dir`.
    pub fn load_corpus(&self, raw_dir: &Path, processed_dir: Option<&Path>) -> Result<Vec<CorpusDocument>> {
        let base = match processed_dir {
            Some(p) if Self::non_empty_dir(p) => p,
            _ => raw_dir,
        };
        if !base.exists() { anyhow::bail!("Corpus directory not found: {}", base.display()); }
        let files = self.list_txt_files(base);
        if files.is_empty() { tracing::warn!("No .txt files found under {}", base.display()); }
        let mut docs = Vec::with_capacity(files.len());
        for path in files {
            let text = self.read_file_content(&path)?;
            let doc_id = Self::extract_doc_id(base, &path);
            docs.push(CorpusDocument { doc_id, path, text });
        }
        tracing::info!(documents = docs.len(), dir = %base.display(), "corpus loaded");
        Ok(docs)
    }

    /// Window every document the same way query documents are windowed.
    pub fn reference_blocks(&self, corpus: &[CorpusDocument]) -> Vec<ReferenceBlock> {
        let mut blocks = Vec::new();
        for doc in corpus {
            let windows = build_windows(&doc.text, self.window_config.window_size, self.window_config.stride);
            blocks.extend(windows.into_iter().map(|w| ReferenceBlock::from_block(&doc.doc_id, w)));
        }
        tracing::info!(documents = corpus.len(), blocks = blocks.len(), "reference blocks built");
        blocks
    }

    fn read_file_content(&self, file_path: &Path) -> Result<String> {
        match fs::read_to_string(file_path) {
            Ok(content) => Ok(content),
            Err(_) => {
                let bytes = fs::read(file_path).with_context(|| format!("reading {}", file_path.display()))?;
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
        }
    }

    /// Path relative to the corpus root without extension, `/`-separated, so
    /// `a/x.txt` and `b/x.txt` stay distinct and top-level files keep their stem.
    fn extract_doc_id(root: &Path, file_path: &Path) -> String {
        let relative = file_path.strip_prefix(root).unwrap_or(file_path).with_extension("");
        let parts: Vec<String> = relative.components().map(|c| c.as_os_str().to_string_lossy().into_owned()).collect();
        if parts.is_empty() { file_path.display().to_string() } else { parts.join("/") }
    }

    fn non_empty_dir(path: &Path) -> bool {
        fs::read_dir(path).map(|mut it| it.next().is_some()).unwrap_or(false)
    }

    fn list_txt_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut txt_files = Vec::new();
        for entry in walkdir::WalkDir::new(root).into_iter().filter_map(|e| e.ok()).filter(|e| e.file_type().is_file()) {
            let path = entry.path(); if path.extension().and_then(|s| s.to_str()) == Some("txt") { txt_files.push(path.to_path_buf()); }
        }
        txt_files.sort(); txt_files
    }
}
