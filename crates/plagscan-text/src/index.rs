use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use plagscan_core::error::{Error, Result};
use plagscan_core::rank::top_k_stable;
use plagscan_core::traits::{LexicalSearcher, ReferenceTable};
use plagscan_core::types::{ReferenceBlock, SearchHit};

use crate::vectorizer::{SparseVec, TfidfVectorizer};

pub const MODEL_FILE: &str = "tfidf_model.json";
pub const MATRIX_FILE: &str = "tfidf_matrix.json";
pub const ID_MAP_FILE: &str = "id_map.json";

#[derive(Serialize, Deserialize)]
struct MatrixFile {
	n_features: usize,
	rows: Vec<SparseVec>,
}

/// TF-IDF rows of every reference block plus the aligned metadata table.
pub struct LexicalIndex {
	vectorizer: TfidfVectorizer,
	matrix: Vec<SparseVec>,
	blocks: Vec<ReferenceBlock>,
	by_uid: HashMap<String, usize>,
}

impl LexicalIndex {
	pub fn build(blocks: Vec<ReferenceBlock>, ngram_min: usize, ngram_max: usize) -> Result<Self> {
		let mut vectorizer = TfidfVectorizer::new(ngram_min, ngram_max);
		let texts: Vec<&str> = blocks.iter().map(|b| b.text.as_str()).collect();
		let matrix = vectorizer.fit_transform(&texts);
		tracing::info!(blocks = blocks.len(), features = vectorizer.n_features(), "lexical index built");
		Self::assemble(vectorizer, matrix, blocks, Path::new("<memory>"))
	}

	fn assemble(vectorizer: TfidfVectorizer, matrix: Vec<SparseVec>, blocks: Vec<ReferenceBlock>, origin: &Path) -> Result<Self> {
		if matrix.len() != blocks.len() {
			return Err(Error::malformed(origin, format!("{} matrix rows but {} id_map entries", matrix.len(), blocks.len())));
		}
		let mut by_uid = HashMap::with_capacity(blocks.len());
		for (i, b) in blocks.iter().enumerate() {
			if by_uid.insert(b.uid.clone(), i).is_some() { return Err(Error::malformed(origin, format!("duplicate uid '{}'", b.uid))); }
		}
		Ok(Self { vectorizer, matrix, blocks, by_uid })
	}

	pub fn vectorizer(&self) -> &TfidfVectorizer { &self.vectorizer }

	pub fn blocks(&self) -> &[ReferenceBlock] { &self.blocks }

	/// Top `top_n` reference blocks by raw cosine, best first; ties keep index order.
	pub fn search(&self, block_text: &str, top_n: usize) -> Vec<SearchHit> {
		if block_text.trim().is_empty() || top_n == 0 { return Vec::new(); }
		let q = self.vectorizer.transform(block_text);
		// unit rows with non-negative weights: cosine is within [0, 1] up to float drift
		let scores: Vec<f32> = self.matrix.iter().map(|row| q.dot(row).clamp(0.0, 1.0)).collect();
		top_k_stable(&scores, top_n)
			.into_iter()
			.map(|i| SearchHit::lexical(self.blocks[i].uid.clone(), scores[i]))
			.collect()
	}

	pub fn save(&self, dir: &Path) -> Result<()> {
		fs::create_dir_all(dir)?;
		write_json(&dir.join(MODEL_FILE), &self.vectorizer)?;
		write_json(&dir.join(MATRIX_FILE), &MatrixFile { n_features: self.vectorizer.n_features(), rows: self.matrix.clone() })?;
		write_json(&dir.join(ID_MAP_FILE), &self.blocks)?;
		tracing::info!(dir = %dir.display(), blocks = self.blocks.len(), "lexical index saved");
		Ok(())
	}

	pub fn load(dir: &Path) -> Result<Self> {
		let vectorizer: TfidfVectorizer = read_json(&dir.join(MODEL_FILE))?;
		let matrix: MatrixFile = read_json(&dir.join(MATRIX_FILE))?;
		let blocks: Vec<ReferenceBlock> = read_json(&dir.join(ID_MAP_FILE))?;

		let n_features = vectorizer.n_features();
		if vectorizer.vocabulary.len() != n_features || matrix.n_features != n_features {
			return Err(Error::malformed(dir, format!("vocabulary/idf/matrix widths disagree ({}, {}, {})", vectorizer.vocabulary.len(), n_features, matrix.n_features)));
		}
		let mut seen = vec![false; n_features];
		for (term, &idx) in &vectorizer.vocabulary {
			match seen.get_mut(idx as usize) {
				Some(slot) if !*slot => *slot = true,
				Some(_) => return Err(Error::malformed(dir, format!("feature id {idx} of '{term}' is used twice"))),
				None => return Err(Error::malformed(dir, format!("feature id {idx} of '{term}' is out of range ({n_features} features)"))),
			}
		}
		let (lo, hi) = vectorizer.ngram_range;
		if lo == 0 || lo > hi { return Err(Error::malformed(dir, format!("invalid n-gram range {lo}..={hi}"))); }
		for (r, row) in matrix.rows.iter().enumerate() {
			let sorted = row.indices.windows(2).all(|w| w[0] < w[1]);
			let in_range = row.indices.iter().all(|&i| (i as usize) < n_features);
			if row.indices.len() != row.values.len() || !sorted || !in_range {
				return Err(Error::malformed(dir, format!("matrix row {r} is inconsistent")));
			}
		}
		let index = Self::assemble(vectorizer, matrix.rows, blocks, dir)?;
		tracing::info!(dir = %dir.display(), blocks = index.blocks.len(), "lexical index loaded");
		Ok(index)
	}
}

impl ReferenceTable for LexicalIndex {
	fn block(&self, uid: &str) -> Option<&ReferenceBlock> { self.by_uid.get(uid).map(|&i| &self.blocks[i]) }
	fn len(&self) -> usize { self.blocks.len() }
}

impl LexicalSearcher for LexicalIndex {
	fn search(&self, text: &str, k: usize) -> anyhow::Result<Vec<SearchHit>> { Ok(Self::search(self, text, k)) }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
	let file = fs::File::create(path)?;
	serde_json::to_writer(BufWriter::new(file), value)?;
	Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
	if !path.exists() { return Err(Error::NotFound(path.display().to_string())); }
	let file = fs::File::open(path)?;
	serde_json::from_reader(BufReader::new(file)).map_err(|e| Error::malformed(path, e.to_string()))
}
