use std::fs;

use plagscan_core::config::Settings;
use plagscan_core::error::Error;
use plagscan_core::traits::{Embedder, LexicalSearcher, ReferenceTable, VectorSearcher};
use plagscan_core::types::{MatchType, ReferenceBlock, SearchHit};
use plagscan_core::windows::build_windows;
use plagscan_embed::HashEmbedder;
use plagscan_hybrid::{build_indices, index_corpus, ComparisonService, Interval};

const SOURCE: &str = "the quick brown fox jumps over lazy dogs while seven sleepy cats watch quietly";
const OTHER: &str = "markets closed higher today after central bankers signalled patience about rates";

fn settings() -> Settings { Settings { window_size: 6, stride: 6, context_margin: 2, ..Settings::default() } }

fn reference_blocks(s: &Settings) -> Vec<ReferenceBlock> {
    let mut blocks = Vec::new();
    for (doc, text) in [("fonte", SOURCE), ("outro", OTHER)] {
        blocks.extend(build_windows(text, s.window_size, s.stride).into_iter().map(|b| ReferenceBlock::from_block(doc, b)));
    }
    blocks
}

fn service(s: Settings) -> ComparisonService<plagscan_text::LexicalIndex, plagscan_vector::SemanticIndex> {
    let embedder = HashEmbedder::new(128);
    let (lexical, semantic) = build_indices(reference_blocks(&s), &embedder, &s).expect("build");
    ComparisonService::new(s, lexical, semantic, Box::new(embedder)).expect("service")
}

#[test]
fn exact_copy_is_literal_with_source_doc() {
    let svc = service(settings());
    let query = "the quick brown fox jumps over planets orbit distant suns in silence";
    let results = svc.compare(query).expect("compare");
    assert_eq!(results.len(), 1, "{results:?}");

    let r = &results[0];
    assert_eq!(r.block_id, 0);
    assert_eq!((r.start_word, r.end_word), (0, 6));
    assert_eq!(r.match_type, MatchType::Literal);
    assert_eq!(r.best_candidate.doc_id, "fonte");
    assert_eq!(r.best_candidate.block_id, 0);
    assert!(r.scores.lex_raw > 0.99 && r.scores.sem_raw > 0.99);
    assert_eq!(r.context_text, "the quick brown fox jumps over planets orbit");

    let json = serde_json::to_value(r).expect("json");
    assert_eq!(json["tipo"], "plagio_literal");
    assert_eq!(json["inicio"], 0);
    assert_eq!(json["fim"], 6);
    assert_eq!(json["melhor_candidato"]["doc_id"], "fonte");
    assert!(json["scores"]["final"].is_number());
}

#[test]
fn case_changed_copy_is_paraphrase() {
    let svc = service(settings());
    let results = svc.compare("THE QUICK BROWN FOX JUMPS OVER").expect("compare");
    assert_eq!(results.len(), 1, "{results:?}");
    assert_eq!(results[0].match_type, MatchType::Paraphrase);
    assert_eq!(results[0].best_candidate.doc_id, "fonte");
    assert_eq!(results[0].scores.lex_raw, 0.0);
}

#[test]
fn results_are_sorted_by_final_score() {
    let svc = service(settings());
    let query = format!("{SOURCE} {OTHER}");
    let results = svc.compare(&query).expect("compare");
    assert!(results.len() >= 2);
    assert!(results.windows(2).all(|w| w[0].scores.final_score > w[1].scores.final_score
        || (w[0].scores.final_score == w[1].scores.final_score && w[0].block_id < w[1].block_id)));

    // the first two windows are verbatim copies of the source blocks
    let literal: Vec<Interval> = results.iter().map(Interval::from).filter(|i| i.match_type == MatchType::Literal).collect();
    assert!(literal.iter().any(|i| (i.start, i.end) == (0, 6)));
    assert!(literal.iter().any(|i| (i.start, i.end) == (6, 12)));
}

#[test]
fn blank_query_is_empty() {
    let svc = service(settings());
    assert!(svc.compare("").expect("empty").is_empty());
    assert!(svc.compare("   \n\t").expect("blank").is_empty());
}

#[test]
fn unrelated_query_reports_nothing() {
    let svc = service(settings());
    assert!(svc.compare("zebras graze peacefully near rivers tonight").expect("compare").is_empty());
}

#[test]
fn mismatched_embedder_is_rejected() {
    let s = settings();
    let (lexical, semantic) = build_indices(reference_blocks(&s), &HashEmbedder::new(128), &s).expect("build");
    let err = ComparisonService::new(s, lexical, semantic, Box::new(HashEmbedder::new(64))).err().expect("mismatch");
    assert!(matches!(err, Error::ModelMismatch { .. }));
}

#[test]
fn invalid_settings_are_rejected() {
    let s = settings();
    let (lexical, semantic) = build_indices(reference_blocks(&s), &HashEmbedder::new(128), &s).expect("build");
    let bad = Settings { stride: 10, ..s };
    let err = ComparisonService::new(bad, lexical, semantic, Box::new(HashEmbedder::new(128))).err().expect("invalid");
    assert!(matches!(err, Error::InvalidConfig(_)));
}

struct GhostLexical;

impl ReferenceTable for GhostLexical {
    fn block(&self, _uid: &str) -> Option<&ReferenceBlock> { None }
    fn len(&self) -> usize { 0 }
}

impl LexicalSearcher for GhostLexical {
    fn search(&self, _text: &str, _k: usize) -> anyhow::Result<Vec<SearchHit>> { Ok(vec![SearchHit::lexical("ghost#3", 0.97)]) }
}

struct GhostVectors;

impl ReferenceTable for GhostVectors {
    fn block(&self, _uid: &str) -> Option<&ReferenceBlock> { None }
    fn len(&self) -> usize { 0 }
}

impl VectorSearcher for GhostVectors {
    fn model_id(&self) -> &str { "unit" }
    fn dim(&self) -> usize { 2 }
    fn search_vec(&self, _q: &[f32], _k: usize) -> anyhow::Result<Vec<SearchHit>> { Ok(vec![SearchHit::semantic("ghost#3", 0.96)]) }
}

struct UnitEmbedder;

impl Embedder for UnitEmbedder {
    fn model_id(&self) -> &str { "unit" }
    fn dim(&self) -> usize { 2 }
    fn max_len(&self) -> usize { 512 }
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> { Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect()) }
}

#[test]
fn unknown_candidate_gets_placeholder_metadata() {
    let svc = ComparisonService::new(settings(), GhostLexical, GhostVectors, Box::new(UnitEmbedder)).expect("service");
    let results = svc.compare("one two three").expect("compare");
    assert_eq!(results.len(), 1);
    let meta = &results[0].best_candidate;
    assert_eq!(meta.doc_id, "ghost#3");
    assert_eq!((meta.block_id, meta.start_word, meta.end_word), (-1, -1, -1));
    assert!(meta.text.is_empty());
    assert_eq!(results[0].match_type, MatchType::Literal);
}

#[test]
fn index_corpus_then_open() {
    let tmp = tempfile::tempdir().unwrap();
    let raw = tmp.path().join("raw");
    fs::create_dir_all(raw.join("nested")).unwrap();
    fs::write(raw.join("fonte.txt"), SOURCE).unwrap();
    fs::write(raw.join("nested").join("outro.txt"), OTHER).unwrap();
    fs::write(raw.join("ignored.md"), "not part of the corpus").unwrap();

    let s = Settings {
        use_fake_embeddings: true,
        data_raw_dir: raw.display().to_string(),
        data_processed_dir: tmp.path().join("processed").display().to_string(),
        data_indexes_dir: tmp.path().join("indexes").display().to_string(),
        ..settings()
    };
    let embedder = plagscan_embed::get_default_embedder(&s).expect("embedder");
    let (lexical, _) = index_corpus(&s, embedder.as_ref()).expect("index");
    assert_eq!(lexical.blocks().len(), 5);
    assert!(s.lexical_index_dir().join("id_map.json").exists());
    assert!(s.semantic_index_dir().join("meta.json").exists());

    let svc = ComparisonService::open(s).expect("open");
    let results = svc.compare(SOURCE).expect("compare");
    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|r| r.match_type == MatchType::Literal && r.best_candidate.doc_id == "fonte"));
}
