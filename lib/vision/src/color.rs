//! Color features: HSV histogram and k-means dominant colors

use crate::error::{ensure_rgb, FeatureError, FeatureResult};
use pixmatch_core::{FeatureVector, PixelBuffer, COLOR_HISTOGRAM_LEN, DOMINANT_COLORS_LEN};
use rand::Rng;

pub const HUE_BINS: usize = 16;
pub const SATURATION_BINS: usize = 8;
pub const VALUE_BINS: usize = 8;

pub const PALETTE_SIZE: usize = 5;
pub const KMEANS_ITERATIONS: usize = 10;

/// Convert normalized RGB (each in [0, 1]) to HSV, each component in [0, 1]
///
/// Hue is wrapped into [0, 1).
pub fn rgb_to_hsv(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = max - min;

    let mut h = if diff == 0.0 {
        0.0
    } else if max == r {
        ((g - b) / diff).rem_euclid(6.0) / 6.0
    } else if max == g {
        ((b - r) / diff + 2.0) / 6.0
    } else {
        ((r - g) / diff + 4.0) / 6.0
    };
    if h >= 1.0 {
        h -= 1.0;
    }

    let s = if max == 0.0 { 0.0 } else { diff / max };
    (h, s, max)
}

/// Histogram cell of an HSV triple: `h * 64 + s * 8 + v`
#[inline]
pub fn hsv_bin(h: f32, s: f32, v: f32) -> usize {
    let hb = ((h * HUE_BINS as f32) as usize).min(HUE_BINS - 1);
    let sb = ((s * SATURATION_BINS as f32) as usize).min(SATURATION_BINS - 1);
    let vb = ((v * VALUE_BINS as f32) as usize).min(VALUE_BINS - 1);
    hb * SATURATION_BINS * VALUE_BINS + sb * VALUE_BINS + vb
}

/// 16x8x8 HSV histogram normalized to sum to 1
pub fn color_histogram(buffer: &PixelBuffer) -> FeatureResult<FeatureVector> {
    ensure_rgb(buffer)?;

    let mut counts = vec![0u32; COLOR_HISTOGRAM_LEN];
    let mut total = 0u32;
    for px in buffer.pixels() {
        let (h, s, v) = rgb_to_hsv(
            px[0] as f32 / 255.0,
            px[1] as f32 / 255.0,
            px[2] as f32 / 255.0,
        );
        counts[hsv_bin(h, s, v)] += 1;
        total += 1;
    }

    if total == 0 {
        return Err(FeatureError::NoSamples);
    }

    let total = total as f32;
    Ok(FeatureVector::new(counts.into_iter().map(|c| c as f32 / total).collect()))
}

/// Five dominant colors by k-means in RGB space, flattened and scaled to [0, 1]
///
/// Centroids are seeded from pixels drawn with `rng`, then refined for a fixed
/// number of iterations. An empty cluster collapses to black.
pub fn dominant_colors<R: Rng + ?Sized>(buffer: &PixelBuffer, rng: &mut R) -> FeatureResult<FeatureVector> {
    ensure_rgb(buffer)?;

    let points: Vec<[f32; 3]> = buffer
        .pixels()
        .map(|px| [px[0] as f32, px[1] as f32, px[2] as f32])
        .collect();
    if points.is_empty() {
        return Err(FeatureError::NoSamples);
    }

    let mut centroids: Vec<[f32; 3]> = (0..PALETTE_SIZE)
        .map(|_| points[rng.random_range(0..points.len())])
        .collect();

    let mut assignments = vec![0usize; points.len()];
    for _ in 0..KMEANS_ITERATIONS {
        for (point, slot) in points.iter().zip(assignments.iter_mut()) {
            *slot = nearest_centroid(point, &centroids);
        }

        let mut sums = [[0.0f64; 3]; PALETTE_SIZE];
        let mut counts = [0usize; PALETTE_SIZE];
        for (point, &cluster) in points.iter().zip(assignments.iter()) {
            for c in 0..3 {
                sums[cluster][c] += point[c] as f64;
            }
            counts[cluster] += 1;
        }

        for (k, centroid) in centroids.iter_mut().enumerate() {
            *centroid = if counts[k] == 0 {
                [0.0; 3]
            } else {
                let n = counts[k] as f64;
                [
                    (sums[k][0] / n) as f32,
                    (sums[k][1] / n) as f32,
                    (sums[k][2] / n) as f32,
                ]
            };
        }
    }

    let mut flat = Vec::with_capacity(DOMINANT_COLORS_LEN);
    for centroid in &centroids {
        flat.extend(centroid.iter().map(|c| c / 255.0));
    }
    Ok(FeatureVector::new(flat))
}

fn nearest_centroid(point: &[f32; 3], centroids: &[[f32; 3]]) -> usize {
    let mut best = 0;
    let mut best_dist = f32::INFINITY;
    for (k, centroid) in centroids.iter().enumerate() {
        let dist: f32 = (0..3).map(|c| (point[c] - centroid[c]).powi(2)).sum();
        if dist < best_dist {
            best_dist = dist;
            best = k;
        }
    }
    best
}
