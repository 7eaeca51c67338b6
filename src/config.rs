use anyhow::{anyhow, Context, Result};
use pixmatch_similarity::MatchConfig;
use pixmatch_vision::PipelineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Combined configuration file for the CLI
///
/// ```json
/// {
///   "pipeline": { "canonical_size": 256, "kmeans_seed": 7 },
///   "matching": { "min_score": 0.2, "category_rules": [] }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub pipeline: PipelineConfig,
    pub matching: MatchConfig,
}

impl AppConfig {
    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(anyhow!("Config file '{}' not found", path.display()));
        }

        let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let config: AppConfig =
            serde_json::from_slice(&data).with_context(|| format!("parsing {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// The given file, or defaults when no path is set
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.pipeline.validate().context("invalid pipeline config")?;
        self.matching.validate().context("invalid matching config")?;
        Ok(())
    }
}
