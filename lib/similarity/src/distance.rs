//! Vector similarity metrics for fingerprints
//!
//! Every function returns a score where higher means more alike. Inputs that
//! cannot be compared (empty or of different lengths) score 0 rather than
//! erroring. Accumulation happens in f64.

use serde::{Deserialize, Serialize};

pub const COSINE_WEIGHT: f64 = 0.5;
pub const EUCLIDEAN_WEIGHT: f64 = 0.3;
pub const CORRELATION_WEIGHT: f64 = 0.2;

/// Per-metric scores kept for diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimilarityBreakdown {
    pub cosine: f32,
    pub euclidean: f32,
    pub correlation: f32,
    /// Weighted blend of the three, clamped to [0, 1]
    pub combined: f32,
}

#[inline]
fn comparable(a: &[f32], b: &[f32]) -> bool {
    !a.is_empty() && a.len() == b.len()
}

/// Cosine of the angle between `a` and `b`; 0 if either has zero norm
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if !comparable(a, b) {
        return 0.0;
    }
    cosine(a, b) as f32
}

/// `1 / (1 + ||a - b||)`, in (0, 1]
pub fn euclidean_similarity(a: &[f32], b: &[f32]) -> f32 {
    if !comparable(a, b) {
        return 0.0;
    }
    euclidean(a, b) as f32
}

/// Absolute Pearson correlation of the paired elements; 0 if either is constant
pub fn correlation_similarity(a: &[f32], b: &[f32]) -> f32 {
    if !comparable(a, b) {
        return 0.0;
    }
    correlation(a, b) as f32
}

/// Combined similarity: `0.5 cosine + 0.3 euclidean + 0.2 correlation`, clamped to [0, 1]
pub fn combined_similarity(a: &[f32], b: &[f32]) -> f32 {
    similarity_breakdown(a, b).combined
}

/// All three metrics plus the combined score
pub fn similarity_breakdown(a: &[f32], b: &[f32]) -> SimilarityBreakdown {
    if !comparable(a, b) {
        return SimilarityBreakdown::default();
    }

    let cos = cosine(a, b);
    let euc = euclidean(a, b);
    let corr = correlation(a, b);
    let combined = (COSINE_WEIGHT * cos + EUCLIDEAN_WEIGHT * euc + CORRELATION_WEIGHT * corr).clamp(0.0, 1.0);

    SimilarityBreakdown {
        cosine: cos as f32,
        euclidean: euc as f32,
        correlation: corr as f32,
        combined: combined as f32,
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f64 {
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

fn euclidean(a: &[f32], b: &[f32]) -> f64 {
    let distance = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (*x as f64 - *y as f64).powi(2))
        .sum::<f64>()
        .sqrt();
    1.0 / (1.0 + distance)
}

fn correlation(a: &[f32], b: &[f32]) -> f64 {
    let n = a.len() as f64;
    let mean_a = a.iter().map(|x| *x as f64).sum::<f64>() / n;
    let mean_b = b.iter().map(|x| *x as f64).sum::<f64>() / n;

    let mut cov = 0.0f64;
    let mut var_a = 0.0f64;
    let mut var_b = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        let dx = *x as f64 - mean_a;
        let dy = *y as f64 - mean_b;
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    if var_a == 0.0 || var_b == 0.0 {
        return 0.0;
    }
    (cov / (var_a.sqrt() * var_b.sqrt())).abs()
}
