use plagscan_core::windows::word_count;
use plagscan_core::{build_windows, extend_context};

fn words(n: usize) -> String { (0..n).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ") }

#[test]
fn empty_text_or_zero_window_yields_nothing() {
    assert!(build_windows("", 40, 20).is_empty());
    assert!(build_windows("   \n\t ", 40, 20).is_empty());
    assert!(build_windows("some words here", 0, 20).is_empty());
}

#[test]
fn overlapping_windows_cover_every_word_in_order() {
    for (n, size, stride) in [(1, 40, 20), (10, 4, 2), (11, 4, 2), (100, 40, 20), (7, 3, 3), (9, 5, 1)] {
        let text = words(n);
        let blocks = build_windows(&text, size, stride);
        assert!(!blocks.is_empty());
        assert_eq!(blocks[0].start_word, 0);
        assert_eq!(blocks.last().expect("last").end_word, n, "terminal block reaches the end (n={n})");

        let mut covered = vec![false; n];
        for (i, b) in blocks.iter().enumerate() {
            assert_eq!(b.block_id, i);
            assert!(b.start_word < b.end_word && b.end_word <= n);
            assert!(!b.text.is_empty());
            assert_eq!(b.text.split(' ').count(), b.end_word - b.start_word);
            for c in covered.iter_mut().take(b.end_word).skip(b.start_word) { *c = true; }
            if i + 1 < blocks.len() {
                assert_eq!(b.end_word - b.start_word, size, "only the terminal block may be short");
                assert!(blocks[i + 1].start_word >= b.start_word);
            }
        }
        assert!(covered.iter().all(|c| *c), "n={n} size={size} stride={stride}");
    }
}

#[test]
fn zero_stride_means_non_overlapping() {
    let blocks = build_windows(&words(10), 4, 0);
    let spans: Vec<(usize, usize)> = blocks.iter().map(|b| (b.start_word, b.end_word)).collect();
    assert_eq!(spans, vec![(0, 4), (4, 8), (8, 10)]);
}

#[test]
fn stops_once_a_window_reaches_the_end() {
    let blocks = build_windows(&words(6), 4, 2);
    let spans: Vec<(usize, usize)> = blocks.iter().map(|b| (b.start_word, b.end_word)).collect();
    assert_eq!(spans, vec![(0, 4), (2, 6)]);
}

#[test]
fn surface_form_is_preserved() {
    let blocks = build_windows("  Olá,\tMUNDO!  ação\n", 10, 5);
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].text, "Olá, MUNDO! ação");
}

#[test]
fn context_is_clipped_to_the_text() {
    let text = words(10);
    assert_eq!(extend_context(&text, 4, 6, 2), "w2 w3 w4 w5 w6 w7");
    assert_eq!(extend_context(&text, 0, 2, 5), "w0 w1 w2 w3 w4 w5 w6");
    assert_eq!(extend_context(&text, 8, 10, 3), "w5 w6 w7 w8 w9");
    assert_eq!(extend_context(&text, 0, 10, 0), text);
    assert_eq!(word_count(&text), 10);
}
