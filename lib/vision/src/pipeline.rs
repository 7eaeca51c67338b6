//! Feature extraction pipeline
//!
//! Runs every extractor of [`FEATURE_TABLE`] against one canonical buffer and
//! combines the results into a [`Fingerprint`]. Extractors are isolated from
//! each other: a failing extractor contributes a zero vector of its fixed
//! length and a `warn!` log line, never an error.
//!
//! ```text
//!  encoded image ──> Resampler ──> canonical RGB ──┬──> colorHistogram
//!                                                  ├──> analysis gray ──> edge / texture / shape / contrast
//!                                                  ├──> brightness gray ──> brightness
//!                                                  └──> palette RGB ──> dominantColors (seeded k-means)
//!                                                               │
//!                                                   weights + concatenation
//!                                                               │
//!                                                          Fingerprint
//! ```

use crate::canonical::{ImageResampler, Resampler};
use crate::combine::{combine, FeatureKind, FeatureWeights};
use crate::config::PipelineConfig;
use crate::error::{FeatureError, FeatureResult};
use crate::{color, edge, shape, texture, tone};
use pixmatch_core::{ColorMode, FeatureVector, Fingerprint, PixelBuffer, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::cell::OnceCell;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

type ExtractFn = fn(&FeatureContext<'_>, &mut ChaCha8Rng) -> FeatureResult<FeatureVector>;

/// One row of the extractor table
pub struct FeatureEntry {
    pub kind: FeatureKind,
    extract: ExtractFn,
}

impl FeatureEntry {
    pub fn run(&self, ctx: &FeatureContext<'_>, rng: &mut ChaCha8Rng) -> ExtractorOutcome {
        match (self.extract)(ctx, rng) {
            Ok(values) => ExtractorOutcome::Extracted(values),
            Err(err) => ExtractorOutcome::Failed(err),
        }
    }
}

/// Extractors in fingerprint order
pub const FEATURE_TABLE: [FeatureEntry; 7] = [
    FeatureEntry { kind: FeatureKind::ColorHistogram, extract: extract_color_histogram },
    FeatureEntry { kind: FeatureKind::EdgeFeatures, extract: extract_edges },
    FeatureEntry { kind: FeatureKind::TextureFeatures, extract: extract_texture },
    FeatureEntry { kind: FeatureKind::ShapeFeatures, extract: extract_shape },
    FeatureEntry { kind: FeatureKind::DominantColors, extract: extract_dominant_colors },
    FeatureEntry { kind: FeatureKind::Brightness, extract: extract_brightness },
    FeatureEntry { kind: FeatureKind::Contrast, extract: extract_contrast },
];

fn extract_color_histogram(ctx: &FeatureContext<'_>, _rng: &mut ChaCha8Rng) -> FeatureResult<FeatureVector> {
    color::color_histogram(ctx.canonical)
}

fn extract_edges(ctx: &FeatureContext<'_>, _rng: &mut ChaCha8Rng) -> FeatureResult<FeatureVector> {
    edge::edge_histogram(ctx.analysis_gray()?)
}

fn extract_texture(ctx: &FeatureContext<'_>, _rng: &mut ChaCha8Rng) -> FeatureResult<FeatureVector> {
    texture::texture_histogram(ctx.analysis_gray()?)
}

fn extract_shape(ctx: &FeatureContext<'_>, _rng: &mut ChaCha8Rng) -> FeatureResult<FeatureVector> {
    shape::shape_descriptor(ctx.analysis_gray()?)
}

fn extract_dominant_colors(ctx: &FeatureContext<'_>, rng: &mut ChaCha8Rng) -> FeatureResult<FeatureVector> {
    let size = ctx.config.palette_size;
    let palette = ctx.derive(size, ColorMode::Rgb)?;
    color::dominant_colors(&palette, rng)
}

fn extract_brightness(ctx: &FeatureContext<'_>, _rng: &mut ChaCha8Rng) -> FeatureResult<FeatureVector> {
    let size = ctx.config.brightness_size;
    tone::brightness(&ctx.derive(size, ColorMode::Grayscale)?)
}

fn extract_contrast(ctx: &FeatureContext<'_>, _rng: &mut ChaCha8Rng) -> FeatureResult<FeatureVector> {
    tone::contrast(ctx.analysis_gray()?)
}

/// Inputs shared by the extractors of a single call
pub struct FeatureContext<'a> {
    canonical: &'a PixelBuffer,
    config: &'a PipelineConfig,
    resampler: &'a dyn Resampler,
    analysis: OnceCell<FeatureResult<PixelBuffer>>,
}

impl<'a> FeatureContext<'a> {
    pub fn new(canonical: &'a PixelBuffer, config: &'a PipelineConfig, resampler: &'a dyn Resampler) -> Self {
        Self {
            canonical,
            config,
            resampler,
            analysis: OnceCell::new(),
        }
    }

    pub fn canonical(&self) -> &PixelBuffer {
        self.canonical
    }

    /// Grayscale buffer at `analysis_size`, computed once per call
    pub fn analysis_gray(&self) -> FeatureResult<&PixelBuffer> {
        self.analysis
            .get_or_init(|| self.derive(self.config.analysis_size, ColorMode::Grayscale))
            .as_ref()
            .map_err(|e| e.clone())
    }

    fn derive(&self, size: u32, mode: ColorMode) -> FeatureResult<PixelBuffer> {
        self.resampler
            .resample_buffer(self.canonical, size, size, mode)
            .map_err(|e| FeatureError::Resample(e.to_string()))
    }
}

/// Result of running one extractor
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractorOutcome {
    Extracted(FeatureVector),
    Failed(FeatureError),
}

impl ExtractorOutcome {
    /// Collapse to a vector of exactly `kind.len()` values
    ///
    /// Failures, wrong-length output and non-finite values all become zeros.
    pub fn resolve(self, kind: FeatureKind) -> ExtractedFeature {
        let checked = match self {
            ExtractorOutcome::Extracted(values) if values.dim() != kind.len() => Err(FeatureError::WrongLength {
                expected: kind.len(),
                actual: values.dim(),
            }),
            ExtractorOutcome::Extracted(values) if !values.is_finite() => Err(FeatureError::NonFinite),
            ExtractorOutcome::Extracted(values) => Ok(values),
            ExtractorOutcome::Failed(err) => Err(err),
        };

        match checked {
            Ok(values) => ExtractedFeature {
                kind,
                values,
                failure: None,
            },
            Err(err) => {
                warn!("Feature extractor '{}' failed: {}", kind, err);
                ExtractedFeature {
                    kind,
                    values: FeatureVector::zeros(kind.len()),
                    failure: Some(err),
                }
            }
        }
    }
}

/// Unweighted output of one extractor
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedFeature {
    pub kind: FeatureKind,
    pub values: FeatureVector,
    pub failure: Option<FeatureError>,
}

/// All unweighted features of one image
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureReport {
    features: Vec<ExtractedFeature>,
}

impl FeatureReport {
    pub fn new(features: Vec<ExtractedFeature>) -> Self {
        Self { features }
    }

    pub fn get(&self, kind: FeatureKind) -> Option<&ExtractedFeature> {
        self.features.iter().find(|f| f.kind == kind)
    }

    pub fn features(&self) -> &[ExtractedFeature] {
        &self.features
    }

    /// Kinds whose extractor failed and were zero-filled
    pub fn failed(&self) -> Vec<FeatureKind> {
        self.features
            .iter()
            .filter(|f| f.failure.is_some())
            .map(|f| f.kind)
            .collect()
    }
}

/// Turns images into fingerprints
#[derive(Clone)]
pub struct FeaturePipeline {
    config: PipelineConfig,
    weights: FeatureWeights,
    resampler: Arc<dyn Resampler>,
}

impl std::fmt::Debug for FeaturePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeaturePipeline")
            .field("config", &self.config)
            .field("weights", &self.weights)
            .finish_non_exhaustive()
    }
}

impl Default for FeaturePipeline {
    fn default() -> Self {
        Self {
            config: PipelineConfig::default(),
            weights: FeatureWeights::default(),
            resampler: Arc::new(ImageResampler::default()),
        }
    }
}

impl FeaturePipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let weights = FeatureWeights::with_overrides(&config.weight_overrides);
        Ok(Self {
            config,
            weights,
            resampler: Arc::new(ImageResampler::default()),
        })
    }

    /// Replace the decoding/resampling backend
    #[must_use]
    pub fn with_resampler(mut self, resampler: Arc<dyn Resampler>) -> Self {
        self.resampler = resampler;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn weights(&self) -> &FeatureWeights {
        &self.weights
    }

    /// Decode an encoded image and fingerprint it
    pub fn fingerprint_image(&self, encoded: &[u8]) -> Result<Fingerprint> {
        let size = self.config.canonical_size;
        let canonical = self.resampler.resample(encoded, size, size, ColorMode::Rgb)?;
        self.extract_fingerprint(&canonical)
    }

    /// Read an image file and fingerprint it
    pub fn fingerprint_path(&self, path: impl AsRef<Path>) -> Result<Fingerprint> {
        let encoded = std::fs::read(path.as_ref())?;
        debug!("Fingerprinting {:?} ({} bytes)", path.as_ref(), encoded.len());
        self.fingerprint_image(&encoded)
    }

    /// Fingerprint raw pixel data; fails if `data` does not match the dimensions
    pub fn fingerprint_raw(&self, width: u32, height: u32, mode: ColorMode, data: Vec<u8>) -> Result<Fingerprint> {
        let buffer = PixelBuffer::new(width, height, mode, data)?;
        self.extract_fingerprint(&buffer)
    }

    pub fn extract_fingerprint(&self, buffer: &PixelBuffer) -> Result<Fingerprint> {
        let report = self.extract_features(buffer)?;
        combine(&report, &self.weights)
    }

    /// Run every extractor, seeding k-means from config or the pixel data
    pub fn extract_features(&self, buffer: &PixelBuffer) -> Result<FeatureReport> {
        let seed = self.config.kmeans_seed.unwrap_or_else(|| content_seed(buffer));
        self.extract_features_seeded(buffer, seed)
    }

    /// Run every extractor with an explicit k-means seed
    ///
    /// The only error is failing to bring `buffer` to the canonical size.
    pub fn extract_features_seeded(&self, buffer: &PixelBuffer, seed: u64) -> Result<FeatureReport> {
        let size = self.config.canonical_size;
        let canonical = self.resampler.resample_buffer(buffer, size, size, ColorMode::Rgb)?;

        let ctx = FeatureContext::new(&canonical, &self.config, self.resampler.as_ref());
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let features = FEATURE_TABLE
            .iter()
            .map(|entry| entry.run(&ctx, &mut rng).resolve(entry.kind))
            .collect();

        Ok(FeatureReport::new(features))
    }

    /// Fingerprint many buffers in parallel. Each call owns its own generator.
    pub fn extract_batch(&self, buffers: &[PixelBuffer]) -> Vec<Result<Fingerprint>> {
        buffers
            .par_iter()
            .map(|buffer| self.extract_fingerprint(buffer))
            .collect()
    }
}

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn fnv1a(hash: u64, bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(hash, |h, &b| (h ^ u64::from(b)).wrapping_mul(FNV_PRIME))
}

/// Seed derived from the buffer contents, so identical images get identical palettes
///
/// FNV-1a over the little-endian width, height and pixel bytes. Stable across
/// platforms and toolchains.
pub fn content_seed(buffer: &PixelBuffer) -> u64 {
    let hash = fnv1a(FNV_OFFSET, &buffer.width().to_le_bytes());
    let hash = fnv1a(hash, &buffer.height().to_le_bytes());
    fnv1a(hash, buffer.as_bytes())
}
