//! Moment-based shape descriptor of the thresholded foreground

use crate::error::{ensure_grayscale, FeatureResult};
use pixmatch_core::{FeatureVector, PixelBuffer, SHAPE_DESCRIPTOR_LEN};
use std::f64::consts::PI;

/// Pixels brighter than this are foreground
pub const FOREGROUND_THRESHOLD: u8 = 128;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct RawMoments {
    m00: f64,
    m10: f64,
    m01: f64,
    m20: f64,
    m11: f64,
    m02: f64,
}

/// `[hu1, hu2, compactness, aspect_ratio, eta20, eta11, eta02]`
///
/// Returns zeros when the mask has no foreground.
pub fn shape_descriptor(gray: &PixelBuffer) -> FeatureResult<FeatureVector> {
    ensure_grayscale(gray)?;

    let (width, height) = (gray.width(), gray.height());
    let mask: Vec<bool> = gray
        .as_bytes()
        .iter()
        .map(|v| *v > FOREGROUND_THRESHOLD)
        .collect();
    let is_fg = |x: i64, y: i64| -> bool {
        x >= 0
            && y >= 0
            && x < width as i64
            && y < height as i64
            && mask[(y as u64 * width as u64 + x as u64) as usize]
    };

    let mut m = RawMoments::default();
    let mut perimeter = 0u64;
    for y in 0..height as i64 {
        for x in 0..width as i64 {
            if !is_fg(x, y) {
                continue;
            }
            let (xf, yf) = (x as f64, y as f64);
            m.m00 += 1.0;
            m.m10 += xf;
            m.m01 += yf;
            m.m20 += xf * xf;
            m.m11 += xf * yf;
            m.m02 += yf * yf;

            // pixels outside the image count as background
            if !is_fg(x, y - 1) || !is_fg(x + 1, y) || !is_fg(x, y + 1) || !is_fg(x - 1, y) {
                perimeter += 1;
            }
        }
    }

    if m.m00 == 0.0 {
        return Ok(FeatureVector::zeros(SHAPE_DESCRIPTOR_LEN));
    }

    let xc = m.m10 / m.m00;
    let yc = m.m01 / m.m00;
    let mu20 = m.m20 - xc * m.m10;
    let mu11 = m.m11 - xc * m.m01;
    let mu02 = m.m02 - yc * m.m01;

    let area_sq = m.m00 * m.m00;
    let eta20 = mu20 / area_sq;
    let eta11 = mu11 / area_sq;
    let eta02 = mu02 / area_sq;

    let hu1 = eta20 + eta02;
    let hu2 = (eta20 - eta02).powi(2) + 4.0 * eta11 * eta11;

    let compactness = if perimeter == 0 {
        0.0
    } else {
        4.0 * PI * m.m00 / (perimeter as f64).powi(2)
    };

    let aspect_ratio = if mu20 > 0.0 && mu02 > 0.0 {
        (mu20 / mu02).sqrt()
    } else {
        1.0
    };

    Ok(FeatureVector::new(
        [hu1, hu2, compactness, aspect_ratio, eta20, eta11, eta02]
            .iter()
            .map(|v| *v as f32)
            .collect(),
    ))
}
