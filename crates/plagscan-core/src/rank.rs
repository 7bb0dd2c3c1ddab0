use std::cmp::Ordering;

/// Indices of the `k` highest scores, best first.
///
/// Equal scores keep their original index order. NaN scores sort last.
pub fn top_k_stable(scores: &[f32], k: usize) -> Vec<usize> {
    if k == 0 { return Vec::new(); }
    let mut order: Vec<usize> = (0..scores.len()).collect();
    // sort_by is stable, so ties stay in index order
    order.sort_by(|&a, &b| desc_nan_last(scores[a], scores[b]));
    order.truncate(k);
    order
}

/// Descending comparison that orders NaN after every real number.
pub fn desc_nan_last(a: f32, b: f32) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

/// Dot product of two equally sized slices; cosine similarity for unit vectors.
pub fn dot(a: &[f32], b: &[f32]) -> f32 { a.iter().zip(b).map(|(x, y)| x * y).sum() }

pub fn l2_norm(v: &[f32]) -> f32 { v.iter().map(|x| x * x).sum::<f32>().sqrt() }
