//! Sobel edge-strength histogram

use crate::error::{ensure_grayscale, ensure_interior, FeatureResult};
use pixmatch_core::{FeatureVector, PixelBuffer, EDGE_HISTOGRAM_LEN};

const SOBEL_X: [i32; 9] = [-1, 0, 1, -2, 0, 2, -1, 0, 1];
const SOBEL_Y: [i32; 9] = [-1, -2, -1, 0, 0, 0, 1, 2, 1];

/// Gradient magnitude per pixel, row-major. Border pixels stay at 0.
pub fn sobel_magnitudes(gray: &PixelBuffer) -> FeatureResult<Vec<f32>> {
    ensure_grayscale(gray)?;
    ensure_interior(gray)?;

    let (width, height) = (gray.width(), gray.height());
    let mut magnitudes = vec![0.0f32; gray.pixel_count()];

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let mut gx = 0i32;
            let mut gy = 0i32;
            for ky in 0..3u32 {
                for kx in 0..3u32 {
                    let v = gray.intensity(x + kx - 1, y + ky - 1) as i32;
                    let k = (ky * 3 + kx) as usize;
                    gx += SOBEL_X[k] * v;
                    gy += SOBEL_Y[k] * v;
                }
            }
            magnitudes[(y * width + x) as usize] = ((gx * gx + gy * gy) as f32).sqrt();
        }
    }

    Ok(magnitudes)
}

/// 16-bin histogram of edge magnitudes scaled by the strongest edge
///
/// Counts are divided by the total pixel count, border pixels included
/// (they sit in bin 0 with magnitude 0).
pub fn edge_histogram(gray: &PixelBuffer) -> FeatureResult<FeatureVector> {
    let magnitudes = sobel_magnitudes(gray)?;

    let max = magnitudes.iter().copied().fold(0.0f32, f32::max);
    if max == 0.0 {
        return Ok(FeatureVector::zeros(EDGE_HISTOGRAM_LEN));
    }

    let mut counts = vec![0u32; EDGE_HISTOGRAM_LEN];
    for m in &magnitudes {
        let bin = ((m / max) * EDGE_HISTOGRAM_LEN as f32) as usize;
        counts[bin.min(EDGE_HISTOGRAM_LEN - 1)] += 1;
    }

    let total = magnitudes.len() as f32;
    Ok(FeatureVector::new(counts.into_iter().map(|c| c as f32 / total).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FeatureError;
    use pixmatch_core::ColorMode;

    /// 4x4: two dark columns then two bright columns
    fn step_edge() -> PixelBuffer {
        let row = [0u8, 0, 255, 255];
        let data = row.iter().copied().cycle().take(16).collect();
        PixelBuffer::new(4, 4, ColorMode::Grayscale, data).unwrap()
    }

    #[test]
    fn test_sobel_step_edge() {
        let mags = sobel_magnitudes(&step_edge()).unwrap();
        // interior pixels see the full step: gx = 4 * 255
        assert_eq!(mags[5], 1020.0);
        assert_eq!(mags[6], 1020.0);
        assert_eq!(mags[0], 0.0);
        assert_eq!(mags[15], 0.0);
    }

    #[test]
    fn test_edge_histogram_normalizes_by_total_pixels() {
        let hist = edge_histogram(&step_edge()).unwrap();
        assert_eq!(hist.dim(), EDGE_HISTOGRAM_LEN);
        // 4 interior pixels at max magnitude out of 16 total, not out of 4 interior
        assert!((hist.as_slice()[15] - 0.25).abs() < 1e-6);
        assert!((hist.as_slice()[0] - 0.75).abs() < 1e-6);
        assert!((hist.as_slice().iter().sum::<f32>() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_flat_image_has_zero_histogram() {
        let flat = PixelBuffer::new(6, 6, ColorMode::Grayscale, vec![77; 36]).unwrap();
        let hist = edge_histogram(&flat).unwrap();
        assert!(hist.as_slice().iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_too_small_fails() {
        let tiny = PixelBuffer::new(2, 2, ColorMode::Grayscale, vec![0; 4]).unwrap();
        assert!(matches!(edge_histogram(&tiny), Err(FeatureError::TooSmall { .. })));
    }
}
