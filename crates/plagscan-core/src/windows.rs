//! Word-window segmentation.
//!
//! Text is split on whitespace only. Case, accents and punctuation are kept
//! as-is because literal-copy detection depends on the exact surface form.

use crate::types::Block;

fn split_words(text: &str) -> Vec<&str> { text.split_whitespace().collect() }

/// Slide a `window_size`-word window over `text`, advancing `stride` words
/// at a time (`stride == 0` means non-overlapping windows).
///
/// Stops at the first window that reaches the end of the text, so only the
/// terminal block can be shorter than `window_size`.
pub fn build_windows(text: &str, window_size: usize, stride: usize) -> Vec<Block> {
    let words = split_words(text);
    let n = words.len();
    let mut windows = Vec::new();
    if n == 0 || window_size == 0 { return windows; }
    let step = if stride > 0 { stride } else { window_size };

    let mut start = 0usize;
    while start < n {
        let end = (start + window_size).min(n);
        let chunk = words[start..end].join(" ");
        if !chunk.is_empty() {
            windows.push(Block { block_id: windows.len(), start_word: start, end_word: end, text: chunk });
        }
        if end == n { break; }
        start += step;
    }
    windows
}

/// Widen `[start_word, end_word)` by `margin` words on each side, clipped to
/// the text, and join the slice with single spaces.
pub fn extend_context(text: &str, start_word: usize, end_word: usize, margin: usize) -> String {
    let words = split_words(text);
    let n = words.len();
    let s = start_word.saturating_sub(margin).min(n);
    let e = end_word.saturating_add(margin).min(n);
    if s >= e { return String::new(); }
    words[s..e].join(" ")
}

/// Number of whitespace-separated words in `text`.
pub fn word_count(text: &str) -> usize { text.split_whitespace().count() }
