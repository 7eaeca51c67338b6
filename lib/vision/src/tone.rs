//! Tone features: global brightness statistics and average local contrast

use crate::error::{ensure_grayscale, ensure_interior, FeatureError, FeatureResult};
use pixmatch_core::{FeatureVector, PixelBuffer};

/// `[mean / 255, variance / 255^2, skewness]` of the pixel intensities
///
/// Variance is the population variance; skewness is the third standardized
/// moment, 0 for a flat image.
pub fn brightness(gray: &PixelBuffer) -> FeatureResult<FeatureVector> {
    ensure_grayscale(gray)?;

    let values = gray.as_bytes();
    if values.is_empty() {
        return Err(FeatureError::NoSamples);
    }
    let n = values.len() as f64;

    let mean = values.iter().map(|v| *v as f64).sum::<f64>() / n;
    let variance = values
        .iter()
        .map(|v| (*v as f64 - mean).powi(2))
        .sum::<f64>()
        / n;
    let skewness = if variance == 0.0 {
        0.0
    } else {
        let third = values
            .iter()
            .map(|v| (*v as f64 - mean).powi(3))
            .sum::<f64>()
            / n;
        third / variance.powf(1.5)
    };

    Ok(FeatureVector::new(vec![
        (mean / 255.0) as f32,
        (variance / (255.0 * 255.0)) as f32,
        skewness as f32,
    ]))
}

/// `[average local contrast / 255]` over interior pixels, using 4-neighbours
pub fn contrast(gray: &PixelBuffer) -> FeatureResult<FeatureVector> {
    ensure_grayscale(gray)?;
    ensure_interior(gray)?;

    let mut total = 0.0f64;
    for y in 1..gray.height() - 1 {
        for x in 1..gray.width() - 1 {
            let center = gray.intensity(x, y) as f64;
            let diff = |nx: u32, ny: u32| (center - gray.intensity(nx, ny) as f64).abs();
            total += (diff(x, y - 1) + diff(x + 1, y) + diff(x, y + 1) + diff(x - 1, y)) / 4.0;
        }
    }

    let average = total / gray.interior_count() as f64;
    Ok(FeatureVector::new(vec![(average / 255.0) as f32]))
}
