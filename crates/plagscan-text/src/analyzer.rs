use tantivy::tokenizer::{RemoveLongFilter, SimpleTokenizer, TextAnalyzer, TokenStream};

/// Tokens longer than this are dropped (base64 blobs, URLs without separators).
const MAX_TOKEN_LEN: usize = 64;
const MIN_TOKEN_CHARS: usize = 2;

/// Case-preserving analyzer: alphanumeric runs, no lowercasing, no stop words.
///
/// Literal copies must score higher than paraphrases, so the surface form of
/// every token is kept.
pub fn build_analyzer() -> TextAnalyzer {
	TextAnalyzer::builder(SimpleTokenizer::default())
		.filter(RemoveLongFilter::limit(MAX_TOKEN_LEN))
		.build()
}

/// Split `text` into word tokens of at least two characters.
pub fn tokenize(text: &str) -> Vec<String> {
	let mut analyzer = build_analyzer();
	let mut stream = analyzer.token_stream(text);
	let mut tokens = Vec::new();
	while stream.advance() {
		let tok = &stream.token().text;
		if tok.chars().count() >= MIN_TOKEN_CHARS { tokens.push(tok.clone()); }
	}
	tokens
}

/// Word n-grams of every length in `min_n..=max_n`, joined by single spaces.
pub fn ngrams(tokens: &[String], min_n: usize, max_n: usize) -> Vec<String> {
	let mut out = Vec::new();
	if min_n == 0 { return out; }
	for n in min_n..=max_n {
		if n > tokens.len() { break; }
		out.extend(tokens.windows(n).map(|w| w.join(" ")));
	}
	out
}
