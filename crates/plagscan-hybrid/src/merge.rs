//! Presentation helpers: collapse overlapping suspicious blocks into word
//! intervals and cut the query text into plain and flagged segments.

use serde::{Deserialize, Serialize};

use plagscan_core::types::{BlockResult, MatchType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub start: usize,
    pub end: usize,
    pub match_type: MatchType,
}

impl From<&BlockResult> for Interval {
    fn from(r: &BlockResult) -> Self { Self { start: r.start_word, end: r.end_word, match_type: r.match_type } }
}

/// Merge overlapping or touching intervals; a merged interval keeps the most
/// severe type of its members. Output is sorted by start, and empty
/// intervals are dropped.
pub fn merge_intervals<I>(intervals: I) -> Vec<Interval>
where
    I: IntoIterator<Item = Interval>,
{
    let mut sorted: Vec<Interval> = intervals.into_iter().filter(|i| i.start < i.end).collect();
    sorted.sort_by(|a, b| a.start.cmp(&b.start).then(b.match_type.cmp(&a.match_type)));

    let mut merged: Vec<Interval> = Vec::with_capacity(sorted.len());
    for iv in sorted {
        match merged.last_mut() {
            Some(last) if iv.start <= last.end => {
                last.end = last.end.max(iv.end);
                last.match_type = last.match_type.max(iv.match_type);
            }
            _ => merged.push(iv),
        }
    }
    merged
}

/// A run of words of the query text, flagged or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub match_type: Option<MatchType>,
}

/// Cover every word of `text` exactly once, in order, with alternating plain
/// and flagged segments. Intervals past the end of the text are clipped.
pub fn highlight_segments(text: &str, merged: &[Interval]) -> Vec<Segment> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let n = words.len();
    let seg = |start: usize, end: usize, match_type| Segment { start, end, text: words[start..end].join(" "), match_type };

    let mut out = Vec::new();
    let mut cursor = 0usize;
    for iv in merged {
        let s = iv.start.max(cursor).min(n);
        let e = iv.end.min(n);
        if s >= e { continue; }
        if s > cursor { out.push(seg(cursor, s, None)); }
        out.push(seg(s, e, Some(iv.match_type)));
        cursor = e;
    }
    if cursor < n { out.push(seg(cursor, n, None)); }
    out
}
