use plagscan_core::types::{MatchType, SearchHit};
use plagscan_hybrid::{classify, combine, normalize_scores, CombineParams};

fn params(tau_lex: f32, tau_sem: f32, delta_para: f32) -> CombineParams {
    CombineParams { tau_lex, tau_sem, delta_para, ..CombineParams::default() }
}

#[test]
fn normalize_stays_in_unit_range() {
    let out = normalize_scores(&[0.2, 0.8, 0.5]);
    assert_eq!(out.len(), 3);
    assert!(out.iter().all(|v| (0.0..=1.0).contains(v)));
    assert!((out[0] - 0.0).abs() < 1e-6);
    assert!((out[1] - 1.0).abs() < 1e-6);
    assert!((out[2] - 0.5).abs() < 1e-6);
}

#[test]
fn normalize_degenerate_is_zero() {
    assert_eq!(normalize_scores(&[0.7, 0.7, 0.7]), vec![0.0, 0.0, 0.0]);
    assert_eq!(normalize_scores(&[0.3]), vec![0.0]);
    assert!(normalize_scores(&[]).is_empty());
}

#[test]
fn empty_inputs_give_empty_result() {
    assert!(combine(&[], &[], &CombineParams { k_final: 3, ..CombineParams::default() }).is_empty());
}

#[test]
fn high_on_both_axes_is_literal() {
    let out = combine(&[SearchHit::lexical("a", 0.95)], &[SearchHit::semantic("a", 0.90)], &params(0.9, 0.85, 0.15));
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].id, "a");
    assert_eq!(out[0].match_type, Some(MatchType::Literal));
    assert_eq!(out[0].flags(), vec![MatchType::Literal]);
    // single candidate: both axes degenerate
    assert_eq!(out[0].score_final, 0.0);
    assert_eq!(out[0].score_lex_raw, 0.95);
}

#[test]
fn semantic_only_overlap_is_paraphrase() {
    let out = combine(&[SearchHit::lexical("a", 0.5)], &[SearchHit::semantic("a", 0.9)], &params(0.9, 0.85, 0.3));
    assert_eq!(out[0].match_type, Some(MatchType::Paraphrase));
}

#[test]
fn below_gate_is_never_flagged() {
    let p = CombineParams { min_gate: 0.10, tau_lex: 0.0, tau_sem: 0.0, ..CombineParams::default() };
    let out = combine(&[SearchHit::lexical("a", 0.05)], &[SearchHit::semantic("a", 0.04)], &p);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].match_type, None);
    assert!(out[0].flags().is_empty());
}

#[test]
fn classification_precedence() {
    let p = params(0.85, 0.85, 0.15);
    assert_eq!(classify(0.9, 0.9, &p), Some(MatchType::Literal));
    assert_eq!(classify(0.7, 0.9, &p), Some(MatchType::Paraphrase));
    // between the paraphrase ceiling and tau_lex: neither
    assert_eq!(classify(0.8, 0.9, &p), None);
    assert_eq!(classify(0.95, 0.5, &p), None);
    assert_eq!(classify(0.0, 0.0, &p), None);
}

#[test]
fn union_of_axes_with_missing_scores_as_zero() {
    let lex = [SearchHit::lexical("a", 0.9), SearchHit::lexical("b", 0.2)];
    let sem = [SearchHit::semantic("c", 0.8)];
    let out = combine(&lex, &sem, &CombineParams { alpha: 0.6, k_final: 5, ..CombineParams::default() });
    let ids: Vec<&str> = out.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "c", "b"]);

    let c = &out[1];
    assert_eq!(c.score_lex_raw, 0.0);
    assert_eq!(c.score_sem_norm, 1.0);
    assert!((c.score_final - 0.4).abs() < 1e-6);
    assert!((out[0].score_final - 0.6).abs() < 1e-6);
}

#[test]
fn truncates_to_k_final_and_breaks_ties_by_id() {
    let lex = [SearchHit::lexical("zeta", 0.5), SearchHit::lexical("alpha", 0.5), SearchHit::lexical("mid", 0.5)];
    let out = combine(&lex, &[], &CombineParams { k_final: 2, ..CombineParams::default() });
    let ids: Vec<&str> = out.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["alpha", "mid"]);
}

#[test]
fn final_score_is_sorted_descending() {
    let lex = [SearchHit::lexical("a", 0.1), SearchHit::lexical("b", 0.6), SearchHit::lexical("c", 0.3)];
    let sem = [SearchHit::semantic("a", 0.9), SearchHit::semantic("b", 0.2)];
    let out = combine(&lex, &sem, &CombineParams::default());
    assert!(out.windows(2).all(|w| w[0].score_final >= w[1].score_final));
    assert!(out.iter().all(|c| (0.0..=1.0).contains(&c.score_final)));
}

#[test]
fn negative_semantic_scores_are_kept() {
    let sem = [SearchHit::semantic("a", -0.4), SearchHit::semantic("b", -0.1), SearchHit::semantic("c", 0.2)];
    let out = combine(&[], &sem, &CombineParams::default());
    let by_id = |id: &str| out.iter().find(|c| c.id == id).expect("candidate");

    assert_eq!(by_id("a").score_sem_raw, -0.4);
    assert_eq!(by_id("b").score_sem_raw, -0.1);
    assert!((by_id("a").score_sem_norm - 0.0).abs() < 1e-6);
    assert!((by_id("b").score_sem_norm - 0.5).abs() < 1e-6);
    assert!((by_id("c").score_sem_norm - 1.0).abs() < 1e-6);
    // lexical axis absent for every id
    assert!(out.iter().all(|c| c.score_lex_raw == 0.0));
}

#[test]
fn duplicate_hits_keep_the_best_score() {
    let sem = [SearchHit::semantic("a", -0.3), SearchHit::semantic("a", -0.2)];
    let out = combine(&[SearchHit::lexical("a", 0.5)], &sem, &CombineParams::default());
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].score_sem_raw, -0.2);
    assert_eq!(out[0].score_lex_raw, 0.5);
}
