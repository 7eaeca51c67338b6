//! # pixmatch Vision
//!
//! Closed-form feature extraction for visual fingerprints.
//!
//! Seven independent extractors run on a canonical pixel buffer (or a
//! resampled/grayscale derivative of it):
//!
//! | Feature | Length | Weight |
//! |---------|--------|--------|
//! | HSV color histogram (16x8x8) | 1024 | 0.30 |
//! | Sobel edge histogram | 16 | 0.15 |
//! | LBP texture histogram | 256 | 0.15 |
//! | Moment shape descriptor | 7 | 0.10 |
//! | k-means dominant colors (k=5) | 15 | 0.25 |
//! | Brightness (mean, variance, skew) | 3 | 0.03 |
//! | Local contrast | 1 | 0.02 |
//!
//! ## Example
//!
//! ```rust
//! use pixmatch_core::{PixelBuffer, FINGERPRINT_DIM};
//! use pixmatch_vision::{FeaturePipeline, PipelineConfig};
//!
//! let config = PipelineConfig { canonical_size: 32, analysis_size: 16, ..Default::default() };
//! let pipeline = FeaturePipeline::new(config).unwrap();
//!
//! let buffer = PixelBuffer::solid_rgb(64, 48, [220, 40, 40]).unwrap();
//! let fingerprint = pipeline.extract_fingerprint(&buffer).unwrap();
//! assert_eq!(fingerprint.dim(), FINGERPRINT_DIM);
//! ```

pub mod canonical;
pub mod color;
pub mod combine;
pub mod config;
pub mod edge;
pub mod error;
pub mod pipeline;
pub mod shape;
pub mod texture;
pub mod tone;

pub use canonical::{ImageResampler, Resampler};
pub use combine::{combine, weight_for_name, FeatureKind, FeatureWeights, UNKNOWN_FEATURE_WEIGHT};
pub use config::PipelineConfig;
pub use error::{FeatureError, FeatureResult};
pub use pipeline::{
    content_seed, ExtractedFeature, ExtractorOutcome, FeatureContext, FeatureEntry, FeaturePipeline,
    FeatureReport, FEATURE_TABLE,
};
