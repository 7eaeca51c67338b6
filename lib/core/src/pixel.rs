//! Raw pixel buffers consumed by the feature extractors
//!
//! A [`PixelBuffer`] is a row-major array of 8-bit samples with an explicit
//! width, height and color mode. Buffers are validated on construction and
//! never mutated afterwards.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Channel layout of a pixel buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Three interleaved channels (R, G, B)
    Rgb,
    /// One luma channel
    Grayscale,
}

impl ColorMode {
    /// Number of 8-bit samples per pixel
    #[inline]
    pub fn channels(self) -> usize {
        match self {
            ColorMode::Rgb => 3,
            ColorMode::Grayscale => 1,
        }
    }
}

/// Immutable row-major pixel buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    mode: ColorMode,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Create a buffer, checking that `data` matches the declared dimensions
    pub fn new(width: u32, height: u32, mode: ColorMode, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::EmptyImage { width, height });
        }

        let expected = width as usize * height as usize * mode.channels();
        if data.len() != expected {
            return Err(Error::InvalidBuffer {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            mode,
            data,
        })
    }

    /// Create a buffer where every pixel has the same RGB value
    pub fn solid_rgb(width: u32, height: u32, rgb: [u8; 3]) -> Result<Self> {
        let count = width as usize * height as usize;
        let data = rgb.iter().copied().cycle().take(count * 3).collect();
        Self::new(width, height, ColorMode::Rgb, data)
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    #[must_use]
    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    #[inline]
    #[must_use]
    pub fn channels(&self) -> usize {
        self.mode.channels()
    }

    /// Number of pixels (not bytes)
    #[inline]
    #[must_use]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Samples of the pixel at (x, y). Panics if out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let channels = self.channels();
        let start = (y as usize * self.width as usize + x as usize) * channels;
        &self.data[start..start + channels]
    }

    /// Iterate over pixels in row-major order
    pub fn pixels(&self) -> impl Iterator<Item = &[u8]> {
        self.data.chunks_exact(self.channels())
    }

    /// Single-channel intensity at (x, y); only meaningful for grayscale buffers
    #[inline]
    pub fn intensity(&self, x: u32, y: u32) -> u8 {
        self.pixel(x, y)[0]
    }

    /// True when the buffer has at least one pixel with all eight neighbours
    #[inline]
    pub fn has_interior(&self) -> bool {
        self.width >= 3 && self.height >= 3
    }

    /// Number of pixels with all eight neighbours inside the image
    #[inline]
    pub fn interior_count(&self) -> usize {
        if self.has_interior() {
            (self.width as usize - 2) * (self.height as usize - 2)
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_wrong_length() {
        let err = PixelBuffer::new(2, 2, ColorMode::Rgb, vec![0; 11]).unwrap_err();
        assert!(matches!(err, Error::InvalidBuffer { expected: 12, actual: 11 }));
    }

    #[test]
    fn test_new_rejects_empty() {
        let err = PixelBuffer::new(0, 4, ColorMode::Grayscale, vec![]).unwrap_err();
        assert!(matches!(err, Error::EmptyImage { width: 0, height: 4 }));
    }

    #[test]
    fn test_solid_rgb() {
        let buf = PixelBuffer::solid_rgb(4, 3, [10, 20, 30]).unwrap();
        assert_eq!(buf.pixel_count(), 12);
        assert_eq!(buf.pixel(3, 2), &[10, 20, 30]);
        assert_eq!(buf.pixels().count(), 12);
    }

    #[test]
    fn test_interior_count() {
        let gray = PixelBuffer::new(5, 4, ColorMode::Grayscale, vec![0; 20]).unwrap();
        assert_eq!(gray.interior_count(), 6);

        let thin = PixelBuffer::new(2, 9, ColorMode::Grayscale, vec![0; 18]).unwrap();
        assert!(!thin.has_interior());
        assert_eq!(thin.interior_count(), 0);
    }
}
