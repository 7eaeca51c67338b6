use pixmatch_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration for the feature pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Side of the canonical RGB buffer every image is resampled to
    pub canonical_size: u32,
    /// Side of the grayscale buffer used by edge, texture, shape and contrast
    pub analysis_size: u32,
    /// Side of the grayscale buffer used for brightness statistics
    pub brightness_size: u32,
    /// Side of the RGB buffer sampled by k-means
    pub palette_size: u32,
    /// Fixed k-means seed. When unset the seed is derived from the pixel data.
    pub kmeans_seed: Option<u64>,
    /// Per-feature weight overrides keyed by feature name
    pub weight_overrides: BTreeMap<String, f32>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            canonical_size: 256,
            analysis_size: 128,
            brightness_size: 64,
            palette_size: 64,
            kmeans_seed: None,
            weight_overrides: BTreeMap::new(),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        let sizes = [
            ("canonical_size", self.canonical_size),
            ("analysis_size", self.analysis_size),
            ("brightness_size", self.brightness_size),
            ("palette_size", self.palette_size),
        ];
        for (name, size) in sizes {
            if size == 0 {
                return Err(Error::InvalidConfig(format!("{} must be positive", name)));
            }
        }

        for (name, weight) in &self.weight_overrides {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "weight for '{}' must be a non-negative number",
                    name
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_size_rejected() {
        let config = PipelineConfig {
            analysis_size: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let mut config = PipelineConfig::default();
        config.weight_overrides.insert("contrast".to_string(), -1.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: PipelineConfig = serde_json::from_str(r#"{"kmeans_seed": 42}"#).unwrap();
        assert_eq!(config.kmeans_seed, Some(42));
        assert_eq!(config.canonical_size, 256);
    }
}
