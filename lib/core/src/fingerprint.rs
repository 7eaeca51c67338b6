//! Image fingerprints
//!
//! A fingerprint is the weighted concatenation of every feature sub-vector in
//! a fixed order. Besides the flat values used for similarity it carries the
//! unweighted tone features as named fields, so heuristics never have to read
//! magic offsets out of the flat layout.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

pub const COLOR_HISTOGRAM_LEN: usize = 16 * 8 * 8;
pub const EDGE_HISTOGRAM_LEN: usize = 16;
pub const TEXTURE_HISTOGRAM_LEN: usize = 256;
pub const SHAPE_DESCRIPTOR_LEN: usize = 7;
pub const DOMINANT_COLORS_LEN: usize = 5 * 3;
pub const BRIGHTNESS_LEN: usize = 3;
pub const CONTRAST_LEN: usize = 1;

/// Length of every fingerprint produced by the pipeline (1322)
pub const FINGERPRINT_DIM: usize = COLOR_HISTOGRAM_LEN
    + EDGE_HISTOGRAM_LEN
    + TEXTURE_HISTOGRAM_LEN
    + SHAPE_DESCRIPTOR_LEN
    + DOMINANT_COLORS_LEN
    + BRIGHTNESS_LEN
    + CONTRAST_LEN;

/// Unweighted brightness and contrast features of an image
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct ToneSummary {
    /// [mean, variance, skewness], mean and variance scaled to [0, 1]
    pub brightness: [f32; BRIGHTNESS_LEN],
    /// Average local contrast scaled to [0, 1]
    pub contrast: f32,
}

impl ToneSummary {
    #[inline]
    pub fn mean_brightness(&self) -> f32 {
        self.brightness[0]
    }
}

/// Immutable visual fingerprint of one image
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "FingerprintRepr")]
pub struct Fingerprint {
    values: Vec<f32>,
    tone: ToneSummary,
}

impl Fingerprint {
    /// Wrap a flat weighted vector, checking it has the canonical length
    pub fn new(values: Vec<f32>, tone: ToneSummary) -> Result<Self> {
        if values.len() != FINGERPRINT_DIM {
            return Err(Error::InvalidDimension {
                expected: FINGERPRINT_DIM,
                actual: values.len(),
            });
        }
        Ok(Self { values, tone })
    }

    /// All-zero fingerprint of the canonical length
    #[must_use]
    pub fn zeroed() -> Self {
        Self {
            values: vec![0.0; FINGERPRINT_DIM],
            tone: ToneSummary::default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.values.len()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    #[inline]
    #[must_use]
    pub fn tone(&self) -> &ToneSummary {
        &self.tone
    }

    #[inline]
    #[must_use]
    pub fn into_values(self) -> Vec<f32> {
        self.values
    }
}

#[derive(Deserialize)]
struct FingerprintRepr {
    values: Vec<f32>,
    tone: ToneSummary,
}

impl TryFrom<FingerprintRepr> for Fingerprint {
    type Error = Error;

    fn try_from(repr: FingerprintRepr) -> Result<Self> {
        Fingerprint::new(repr.values, repr.tone)
    }
}

impl AsRef<[f32]> for Fingerprint {
    fn as_ref(&self) -> &[f32] {
        &self.values
    }
}
