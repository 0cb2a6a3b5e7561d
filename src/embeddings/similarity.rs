//! Similarity and distance metrics over embedding vectors
//!
//! Any pure, symmetric `Fn(&[f32], &[f32]) -> f32` plugs into the pair
//! aggregation core. NaN is the contract for "undefined": degenerate
//! inputs must surface as NaN, never as an invented score or a panic.

/// Compute cosine similarity between two embedding vectors.
///
/// Returns a value between -1.0 and 1.0, or NaN when either vector has
/// zero magnitude (the angle is undefined; the aggregation layer
/// propagates NaN rather than masking it as 0.0).
///
/// # Panics
/// Panics if vectors have different dimensions
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(
        a.len(),
        b.len(),
        "Vectors must have same dimension: {} vs {}",
        a.len(),
        b.len()
    );

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return f32::NAN;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Compute Euclidean distance between two embedding vectors.
///
/// Returns the L2 distance (always >= 0.0). To use as a similarity in the
/// aggregation core, negate it so that "larger is more similar" holds.
///
/// # Panics
/// Panics if vectors have different dimensions
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(
        a.len(),
        b.len(),
        "Vectors must have same dimension: {} vs {}",
        a.len(),
        b.len()
    );

    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f32>()
        .sqrt()
}
