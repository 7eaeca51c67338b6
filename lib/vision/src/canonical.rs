//! Canonicalizer: turns encoded images and existing buffers into fixed-size pixel buffers
//!
//! Decoding and resampling are delegated to the `image` crate. The [`Resampler`]
//! trait is the seam the feature pipeline depends on, so callers can swap the
//! decoding backend without touching the extractors.

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, GrayImage, RgbImage};
use pixmatch_core::{ColorMode, Error, PixelBuffer, Result};
use std::path::Path;

/// Produces fixed-resolution pixel buffers
pub trait Resampler: Send + Sync {
    /// Decode an encoded image and resample it to `width` x `height`
    ///
    /// Must be deterministic for identical input and fail with
    /// [`Error::Decode`] on corrupt data.
    fn resample(&self, encoded: &[u8], width: u32, height: u32, mode: ColorMode) -> Result<PixelBuffer>;

    /// Resample an already decoded buffer (used for extractor derivatives)
    fn resample_buffer(&self, buffer: &PixelBuffer, width: u32, height: u32, mode: ColorMode) -> Result<PixelBuffer>;
}

/// [`Resampler`] backed by the `image` crate
#[derive(Debug, Clone, Copy)]
pub struct ImageResampler {
    filter: FilterType,
}

impl Default for ImageResampler {
    fn default() -> Self {
        Self {
            filter: FilterType::Triangle,
        }
    }
}

impl ImageResampler {
    pub fn new(filter: FilterType) -> Self {
        Self { filter }
    }

    pub fn filter(&self) -> FilterType {
        self.filter
    }

    /// Decode an encoded image (PNG, JPEG, ...)
    pub fn decode(&self, encoded: &[u8]) -> Result<DynamicImage> {
        image::load_from_memory(encoded).map_err(|e| Error::Decode(e.to_string()))
    }

    /// Read and resample an image file
    pub fn open(&self, path: impl AsRef<Path>, width: u32, height: u32, mode: ColorMode) -> Result<PixelBuffer> {
        let encoded = std::fs::read(path)?;
        self.resample(&encoded, width, height, mode)
    }

    /// Resample a decoded image
    pub fn resample_image(&self, image: &DynamicImage, width: u32, height: u32, mode: ColorMode) -> Result<PixelBuffer> {
        if width == 0 || height == 0 {
            return Err(Error::EmptyImage { width, height });
        }
        if image.dimensions() == (width, height) {
            return into_buffer(image, mode);
        }
        let resized = image.resize_exact(width, height, self.filter);
        into_buffer(&resized, mode)
    }
}

impl Resampler for ImageResampler {
    fn resample(&self, encoded: &[u8], width: u32, height: u32, mode: ColorMode) -> Result<PixelBuffer> {
        let image = self.decode(encoded)?;
        self.resample_image(&image, width, height, mode)
    }

    fn resample_buffer(&self, buffer: &PixelBuffer, width: u32, height: u32, mode: ColorMode) -> Result<PixelBuffer> {
        if buffer.mode() == mode && buffer.width() == width && buffer.height() == height {
            return Ok(buffer.clone());
        }
        let image = to_dynamic(buffer)?;
        self.resample_image(&image, width, height, mode)
    }
}

/// View a pixel buffer as an `image` crate image
pub fn to_dynamic(buffer: &PixelBuffer) -> Result<DynamicImage> {
    let (width, height) = (buffer.width(), buffer.height());
    let data = buffer.as_bytes().to_vec();
    let expected = buffer.pixel_count() * buffer.channels();

    let image = match buffer.mode() {
        ColorMode::Rgb => RgbImage::from_raw(width, height, data).map(DynamicImage::ImageRgb8),
        ColorMode::Grayscale => GrayImage::from_raw(width, height, data).map(DynamicImage::ImageLuma8),
    };

    image.ok_or(Error::InvalidBuffer {
        expected,
        actual: buffer.as_bytes().len(),
    })
}

fn into_buffer(image: &DynamicImage, mode: ColorMode) -> Result<PixelBuffer> {
    let (width, height) = image.dimensions();
    let data = match mode {
        ColorMode::Rgb => image.to_rgb8().into_raw(),
        ColorMode::Grayscale => image.to_luma8().into_raw(),
    };
    PixelBuffer::new(width, height, mode, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb};
    use std::io::Cursor;

    fn encode_png(image: RgbImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(image)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_resample_png_to_fixed_size() {
        let png = encode_png(RgbImage::from_pixel(40, 20, Rgb([10, 200, 30])));
        let resampler = ImageResampler::default();

        let rgb = resampler.resample(&png, 16, 16, ColorMode::Rgb).unwrap();
        assert_eq!((rgb.width(), rgb.height()), (16, 16));
        let px = rgb.pixel(5, 5);
        for (got, want) in px.iter().zip([10u8, 200, 30]) {
            assert!((*got as i32 - want as i32).abs() <= 1, "{:?}", px);
        }

        let gray = resampler.resample(&png, 8, 4, ColorMode::Grayscale).unwrap();
        assert_eq!(gray.as_bytes().len(), 32);
    }

    #[test]
    fn test_resample_is_deterministic() {
        let mut image = RgbImage::new(33, 17);
        for (x, y, px) in image.enumerate_pixels_mut() {
            *px = Rgb([(x * 7) as u8, (y * 13) as u8, ((x + y) * 3) as u8]);
        }
        let png = encode_png(image);
        let resampler = ImageResampler::default();

        let a = resampler.resample(&png, 12, 12, ColorMode::Rgb).unwrap();
        let b = resampler.resample(&png, 12, 12, ColorMode::Rgb).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_corrupt_input_is_decode_error() {
        let resampler = ImageResampler::default();
        let err = resampler
            .resample(b"definitely not an image", 8, 8, ColorMode::Rgb)
            .unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn test_resample_buffer_to_grayscale() {
        let buffer = PixelBuffer::solid_rgb(6, 6, [255, 255, 255]).unwrap();
        let gray = ImageResampler::default()
            .resample_buffer(&buffer, 3, 3, ColorMode::Grayscale)
            .unwrap();
        assert_eq!(gray.mode(), ColorMode::Grayscale);
        assert!(gray.as_bytes().iter().all(|v| *v >= 254));
    }

    #[test]
    fn test_open_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("swatch.png");
        std::fs::write(&path, encode_png(RgbImage::from_pixel(5, 5, Rgb([0, 0, 255])))).unwrap();

        let buffer = ImageResampler::default().open(&path, 4, 4, ColorMode::Rgb).unwrap();
        let px = buffer.pixel(0, 0);
        assert!(px[0] <= 1 && px[1] <= 1 && px[2] >= 254, "{:?}", px);
    }
}
