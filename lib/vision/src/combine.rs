//! Feature weighting and concatenation
//!
//! The feature order below is part of the fingerprint format: fingerprints
//! built with a different order or different weights are not comparable.

use crate::pipeline::FeatureReport;
use pixmatch_core::{
    Fingerprint, Result, ToneSummary, BRIGHTNESS_LEN, COLOR_HISTOGRAM_LEN, CONTRAST_LEN,
    DOMINANT_COLORS_LEN, EDGE_HISTOGRAM_LEN, FINGERPRINT_DIM, SHAPE_DESCRIPTOR_LEN,
    TEXTURE_HISTOGRAM_LEN,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Weight applied to a feature name that is not part of the table
pub const UNKNOWN_FEATURE_WEIGHT: f32 = 0.10;

/// The seven feature families, in fingerprint order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FeatureKind {
    ColorHistogram,
    EdgeFeatures,
    TextureFeatures,
    ShapeFeatures,
    DominantColors,
    Brightness,
    Contrast,
}

impl FeatureKind {
    /// Concatenation order
    pub const ALL: [FeatureKind; 7] = [
        FeatureKind::ColorHistogram,
        FeatureKind::EdgeFeatures,
        FeatureKind::TextureFeatures,
        FeatureKind::ShapeFeatures,
        FeatureKind::DominantColors,
        FeatureKind::Brightness,
        FeatureKind::Contrast,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FeatureKind::ColorHistogram => "colorHistogram",
            FeatureKind::EdgeFeatures => "edgeFeatures",
            FeatureKind::TextureFeatures => "textureFeatures",
            FeatureKind::ShapeFeatures => "shapeFeatures",
            FeatureKind::DominantColors => "dominantColors",
            FeatureKind::Brightness => "brightness",
            FeatureKind::Contrast => "contrast",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Fixed output length of the extractor
    #[allow(clippy::len_without_is_empty)]
    pub fn len(self) -> usize {
        match self {
            FeatureKind::ColorHistogram => COLOR_HISTOGRAM_LEN,
            FeatureKind::EdgeFeatures => EDGE_HISTOGRAM_LEN,
            FeatureKind::TextureFeatures => TEXTURE_HISTOGRAM_LEN,
            FeatureKind::ShapeFeatures => SHAPE_DESCRIPTOR_LEN,
            FeatureKind::DominantColors => DOMINANT_COLORS_LEN,
            FeatureKind::Brightness => BRIGHTNESS_LEN,
            FeatureKind::Contrast => CONTRAST_LEN,
        }
    }

    pub fn default_weight(self) -> f32 {
        match self {
            FeatureKind::ColorHistogram => 0.30,
            FeatureKind::EdgeFeatures => 0.15,
            FeatureKind::TextureFeatures => 0.15,
            FeatureKind::ShapeFeatures => 0.10,
            FeatureKind::DominantColors => 0.25,
            FeatureKind::Brightness => 0.03,
            FeatureKind::Contrast => 0.02,
        }
    }

    /// Offset of this feature inside a fingerprint
    pub fn offset(self) -> usize {
        Self::ALL
            .iter()
            .take_while(|kind| **kind != self)
            .map(|kind| kind.len())
            .sum()
    }
}

impl std::fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Default weight for a feature name, falling back to [`UNKNOWN_FEATURE_WEIGHT`]
pub fn weight_for_name(name: &str) -> f32 {
    FeatureKind::from_name(name)
        .map(FeatureKind::default_weight)
        .unwrap_or(UNKNOWN_FEATURE_WEIGHT)
}

/// Weight table indexed by [`FeatureKind`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureWeights {
    weights: [f32; 7],
}

impl Default for FeatureWeights {
    fn default() -> Self {
        Self {
            weights: FeatureKind::ALL.map(FeatureKind::default_weight),
        }
    }
}

impl FeatureWeights {
    /// Default weights with named overrides applied. Unknown names are ignored.
    pub fn with_overrides(overrides: &BTreeMap<String, f32>) -> Self {
        let mut weights = Self::default();
        for (name, weight) in overrides {
            match FeatureKind::from_name(name) {
                Some(kind) => weights.weights[kind as usize] = weight.max(0.0),
                None => debug!("Ignoring weight override for unknown feature '{}'", name),
            }
        }
        weights
    }

    #[inline]
    pub fn get(&self, kind: FeatureKind) -> f32 {
        self.weights[kind as usize]
    }
}

/// Weight every feature and concatenate them in [`FeatureKind::ALL`] order
pub fn combine(report: &FeatureReport, weights: &FeatureWeights) -> Result<Fingerprint> {
    let mut values = Vec::with_capacity(FINGERPRINT_DIM);
    for kind in FeatureKind::ALL {
        let weight = weights.get(kind);
        match report.get(kind) {
            Some(feature) => values.extend((&feature.values * weight).into_inner()),
            None => values.extend(std::iter::repeat(0.0).take(kind.len())),
        }
    }

    let brightness = report
        .get(FeatureKind::Brightness)
        .map(|f| f.values.as_slice())
        .unwrap_or(&[]);
    let contrast = report
        .get(FeatureKind::Contrast)
        .map(|f| f.values.as_slice())
        .unwrap_or(&[]);

    let mut tone = ToneSummary::default();
    for (slot, v) in tone.brightness.iter_mut().zip(brightness) {
        *slot = *v;
    }
    tone.contrast = contrast.first().copied().unwrap_or(0.0);

    Fingerprint::new(values, tone)
}
