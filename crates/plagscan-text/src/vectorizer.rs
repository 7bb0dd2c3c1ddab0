use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::analyzer::{ngrams, tokenize};

/// Sparse row with strictly increasing `indices`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVec {
	pub indices: Vec<u32>,
	pub values: Vec<f32>,
}

impl SparseVec {
	pub fn is_empty(&self) -> bool { self.indices.is_empty() }

	pub fn dot(&self, other: &SparseVec) -> f32 {
		let (mut i, mut j, mut acc) = (0usize, 0usize, 0f32);
		while i < self.indices.len() && j < other.indices.len() {
			match self.indices[i].cmp(&other.indices[j]) {
				std::cmp::Ordering::Less => i += 1,
				std::cmp::Ordering::Greater => j += 1,
				std::cmp::Ordering::Equal => { acc += self.values[i] * other.values[j]; i += 1; j += 1; }
			}
		}
		acc
	}

	fn l2_normalize(&mut self) {
		let norm = self.values.iter().map(|v| v * v).sum::<f32>().sqrt();
		if norm > 0.0 { for v in &mut self.values { *v /= norm; } }
	}
}

/// Word n-gram TF-IDF transform, case-sensitive.
///
/// `idf(t) = ln((1 + n) / (1 + df(t))) + 1` (smoothed), raw term counts,
/// rows L2-normalized so that the dot product of two rows is their cosine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
	pub ngram_range: (usize, usize),
	pub vocabulary: HashMap<String, u32>,
	pub idf: Vec<f32>,
}

impl TfidfVectorizer {
	pub fn new(ngram_min: usize, ngram_max: usize) -> Self {
		Self { ngram_range: (ngram_min, ngram_max), vocabulary: HashMap::new(), idf: Vec::new() }
	}

	pub fn n_features(&self) -> usize { self.idf.len() }

	fn terms(&self, text: &str) -> Vec<String> {
		let (lo, hi) = self.ngram_range;
		ngrams(&tokenize(text), lo, hi)
	}

	/// Learn vocabulary and idf from `docs`, then return their rows.
	pub fn fit_transform(&mut self, docs: &[&str]) -> Vec<SparseVec> {
		let doc_terms: Vec<Vec<String>> = docs.iter().map(|d| self.terms(d)).collect();

		let mut df: BTreeMap<&str, u32> = BTreeMap::new();
		for terms in &doc_terms {
			let unique: BTreeSet<&str> = terms.iter().map(String::as_str).collect();
			for t in unique { *df.entry(t).or_insert(0) += 1; }
		}

		// BTreeMap iteration is sorted, so feature ids are deterministic
		let n = docs.len() as f32;
		self.vocabulary = HashMap::with_capacity(df.len());
		self.idf = Vec::with_capacity(df.len());
		for (idx, (term, count)) in df.iter().enumerate() {
			self.vocabulary.insert((*term).to_string(), idx as u32);
			self.idf.push(((1.0 + n) / (1.0 + *count as f32)).ln() + 1.0);
		}
		tracing::debug!(docs = docs.len(), features = self.idf.len(), "tf-idf vocabulary fitted");

		doc_terms.iter().map(|terms| self.weigh(terms)).collect()
	}

	/// Project `text` into the fitted feature space; unknown terms are ignored.
	pub fn transform(&self, text: &str) -> SparseVec { self.weigh(&self.terms(text)) }

	fn weigh(&self, terms: &[String]) -> SparseVec {
		let mut counts: BTreeMap<u32, f32> = BTreeMap::new();
		for t in terms {
			if let Some(&idx) = self.vocabulary.get(t) { *counts.entry(idx).or_insert(0.0) += 1.0; }
		}
		let mut row = SparseVec::default();
		for (idx, tf) in counts {
			row.indices.push(idx);
			row.values.push(tf * self.idf[idx as usize]);
		}
		row.l2_normalize();
		row
	}
}
