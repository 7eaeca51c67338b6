use thiserror::Error;

/// Failure of a single feature extractor
///
/// These never leave the pipeline: the failing extractor's slot is filled
/// with zeros and the error is logged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeatureError {
    #[error("image too small: {width}x{height}, need at least {min}x{min}")]
    TooSmall { width: u32, height: u32, min: u32 },

    #[error("expected a {expected} buffer")]
    WrongMode { expected: &'static str },

    #[error("no pixels to sample")]
    NoSamples,

    #[error("non-finite value in output")]
    NonFinite,

    #[error("expected {expected} values, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    #[error("resample failed: {0}")]
    Resample(String),
}

pub type FeatureResult<T> = std::result::Result<T, FeatureError>;

pub(crate) fn ensure_grayscale(buffer: &pixmatch_core::PixelBuffer) -> FeatureResult<()> {
    match buffer.mode() {
        pixmatch_core::ColorMode::Grayscale => Ok(()),
        pixmatch_core::ColorMode::Rgb => Err(FeatureError::WrongMode { expected: "grayscale" }),
    }
}

pub(crate) fn ensure_rgb(buffer: &pixmatch_core::PixelBuffer) -> FeatureResult<()> {
    match buffer.mode() {
        pixmatch_core::ColorMode::Rgb => Ok(()),
        pixmatch_core::ColorMode::Grayscale => Err(FeatureError::WrongMode { expected: "RGB" }),
    }
}

/// Extractors that look at 8-neighbourhoods need at least one interior pixel
pub(crate) fn ensure_interior(buffer: &pixmatch_core::PixelBuffer) -> FeatureResult<()> {
    if buffer.has_interior() {
        Ok(())
    } else {
        Err(FeatureError::TooSmall {
            width: buffer.width(),
            height: buffer.height(),
            min: 3,
        })
    }
}
