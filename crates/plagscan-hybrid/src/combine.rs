//! Per-block fusion and classification of lexical and semantic candidates.
//!
//! Normalized scores only drive ranking. Classification always looks at the
//! raw cosine scores, because min-max rescaling inside a small candidate set
//! can turn a weak match into a 1.0.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use plagscan_core::config::Settings;
use plagscan_core::rank::desc_nan_last;
use plagscan_core::types::{MatchType, SearchHit, SourceKind};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombineParams {
    pub k_final: usize,
    pub alpha: f32,
    pub tau_lex: f32,
    pub tau_sem: f32,
    pub delta_para: f32,
    pub min_gate: f32,
}

impl From<&Settings> for CombineParams {
    fn from(s: &Settings) -> Self {
        Self { k_final: s.k_final, alpha: s.alpha, tau_lex: s.tau_lex, tau_sem: s.tau_sem, delta_para: s.delta_para, min_gate: s.min_gate }
    }
}

impl Default for CombineParams {
    fn default() -> Self { Self::from(&Settings::default()) }
}

/// A reference block scored against one query block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub score_lex_raw: f32,
    pub score_sem_raw: f32,
    pub score_lex_norm: f32,
    pub score_sem_norm: f32,
    pub score_final: f32,
    pub match_type: Option<MatchType>,
}

impl Candidate {
    /// At most one flag, by construction of `classify`.
    pub fn flags(&self) -> Vec<MatchType> { self.match_type.into_iter().collect() }
}

/// Min-max rescale into `[0, 1]`. All-equal input maps to all zeros.
pub fn normalize_scores(scores: &[f32]) -> Vec<f32> {
    let (min, max) = scores.iter().fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &s| (lo.min(s), hi.max(s)));
    let range = max - min;
    if !(range > 0.0) || !range.is_finite() { return vec![0.0; scores.len()]; }
    scores.iter().map(|&s| ((s - min) / range).clamp(0.0, 1.0)).collect()
}

/// Raw-score classification with fixed precedence: noise gate, literal, paraphrase.
pub fn classify(raw_lex: f32, raw_sem: f32, p: &CombineParams) -> Option<MatchType> {
    if raw_lex.max(raw_sem) < p.min_gate { return None; }
    if raw_lex >= p.tau_lex && raw_sem >= p.tau_sem { return Some(MatchType::Literal); }
    if raw_sem >= p.tau_sem && raw_lex <= (p.tau_lex - p.delta_para).max(0.0) { return Some(MatchType::Paraphrase); }
    None
}

/// Fuse the two candidate lists of one block and return the best `k_final`.
///
/// Candidates are the union of both lists; a missing axis counts as raw 0.0.
/// Output is sorted by `score_final` descending, ties by ascending id.
pub fn combine(top_lex: &[SearchHit], top_sem: &[SearchHit], params: &CombineParams) -> Vec<Candidate> {
    // per axis: best score seen for the id, `None` when that retriever missed it
    let mut raw: BTreeMap<&str, (Option<f32>, Option<f32>)> = BTreeMap::new();
    for hit in top_lex.iter().chain(top_sem) {
        let entry = raw.entry(hit.id.as_str()).or_insert((None, None));
        let slot = match hit.source { SourceKind::Lexical => &mut entry.0, SourceKind::Semantic => &mut entry.1 };
        *slot = Some(slot.map_or(hit.score, |prev| prev.max(hit.score)));
    }
    if raw.is_empty() { return Vec::new(); }

    let lex_raw: Vec<f32> = raw.values().map(|v| v.0.unwrap_or(0.0)).collect();
    let sem_raw: Vec<f32> = raw.values().map(|v| v.1.unwrap_or(0.0)).collect();
    let lex_norm = normalize_scores(&lex_raw);
    let sem_norm = normalize_scores(&sem_raw);

    let mut candidates: Vec<Candidate> = raw
        .keys()
        .enumerate()
        .map(|(i, id)| Candidate {
            id: (*id).to_string(),
            score_lex_raw: lex_raw[i],
            score_sem_raw: sem_raw[i],
            score_lex_norm: lex_norm[i],
            score_sem_norm: sem_norm[i],
            score_final: params.alpha * lex_norm[i] + (1.0 - params.alpha) * sem_norm[i],
            match_type: classify(lex_raw[i], sem_raw[i], params),
        })
        .collect();

    candidates.sort_by(|a, b| match desc_nan_last(a.score_final, b.score_final) {
        Ordering::Equal => a.id.cmp(&b.id),
        other => other,
    });
    candidates.truncate(params.k_final);
    candidates
}
