//! Local Binary Pattern texture histogram

use crate::error::{ensure_grayscale, ensure_interior, FeatureResult};
use pixmatch_core::{FeatureVector, PixelBuffer, TEXTURE_HISTOGRAM_LEN};

/// Neighbour offsets, clockwise from the top-left corner. Bit `i` of the code
/// belongs to `NEIGHBOURS[i]`.
const NEIGHBOURS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
];

/// 8-bit LBP code of an interior pixel
#[inline]
pub fn lbp_code(gray: &PixelBuffer, x: u32, y: u32) -> u8 {
    let center = gray.intensity(x, y);
    let mut code = 0u8;
    for (bit, (dx, dy)) in NEIGHBOURS.iter().enumerate() {
        let nx = (x as i32 + dx) as u32;
        let ny = (y as i32 + dy) as u32;
        if gray.intensity(nx, ny) >= center {
            code |= 1 << bit;
        }
    }
    code
}

/// Raw 256-bin LBP counts over all interior pixels
pub fn lbp_counts(gray: &PixelBuffer) -> FeatureResult<Vec<u32>> {
    ensure_grayscale(gray)?;
    ensure_interior(gray)?;

    let mut counts = vec![0u32; TEXTURE_HISTOGRAM_LEN];
    for y in 1..gray.height() - 1 {
        for x in 1..gray.width() - 1 {
            counts[lbp_code(gray, x, y) as usize] += 1;
        }
    }
    Ok(counts)
}

/// LBP histogram normalized by the interior pixel count
pub fn texture_histogram(gray: &PixelBuffer) -> FeatureResult<FeatureVector> {
    let counts = lbp_counts(gray)?;
    let interior = gray.interior_count() as f64;
    Ok(FeatureVector::new(
        counts.into_iter().map(|c| (c as f64 / interior) as f32).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixmatch_core::ColorMode;

    fn gradient(width: u32, height: u32) -> PixelBuffer {
        let data = (0..width * height).map(|i| ((i * 37) % 251) as u8).collect();
        PixelBuffer::new(width, height, ColorMode::Grayscale, data).unwrap()
    }

    #[test]
    fn test_flat_image_all_255() {
        let flat = PixelBuffer::new(5, 5, ColorMode::Grayscale, vec![9; 25]).unwrap();
        let hist = texture_histogram(&flat).unwrap();
        assert_eq!(hist.as_slice()[255], 1.0);
    }

    #[test]
    fn test_bit_order_clockwise_from_top_left() {
        // only the top-left neighbour is brighter than the center
        #[rustfmt::skip]
        let data = vec![
            200, 0, 0,
            0,  50, 0,
            0,   0, 0,
        ];
        let gray = PixelBuffer::new(3, 3, ColorMode::Grayscale, data).unwrap();
        assert_eq!(lbp_code(&gray, 1, 1), 0b0000_0001);

        #[rustfmt::skip]
        let data = vec![
            0,  0, 0,
            200, 50, 0,
            0,  0, 0,
        ];
        let gray = PixelBuffer::new(3, 3, ColorMode::Grayscale, data).unwrap();
        assert_eq!(lbp_code(&gray, 1, 1), 0b1000_0000);
    }

    #[test]
    fn test_counts_sum_to_interior_pixels() {
        let gray = gradient(17, 11);
        let counts = lbp_counts(&gray).unwrap();
        assert_eq!(counts.iter().sum::<u32>() as usize, gray.interior_count());

        let interior = gray.interior_count() as f64;
        let total: f64 = counts.iter().map(|c| *c as f64 / interior).sum();
        assert!((total - 1.0).abs() < 1e-9);

        let hist = texture_histogram(&gray).unwrap();
        for (bin, count) in hist.as_slice().iter().zip(&counts) {
            assert_eq!(*bin, (*count as f64 / interior) as f32);
        }
    }
}
