use crate::explain::MatchStrategy;
use pixmatch_core::{Error, Fingerprint, Result, ToneSummary};
use serde::{Deserialize, Serialize};

/// Score multiplier per ranking strategy, applied when results are merged
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyWeights {
    pub global: f32,
    pub category: f32,
    pub price: f32,
}

impl Default for StrategyWeights {
    fn default() -> Self {
        Self {
            global: 1.0,
            category: 0.8,
            price: 0.6,
        }
    }
}

impl StrategyWeights {
    pub fn get(&self, strategy: MatchStrategy) -> f32 {
        match strategy {
            MatchStrategy::Global => self.global,
            MatchStrategy::Category => self.category,
            MatchStrategy::Price => self.price,
        }
    }
}

/// Maps the tone of a query image to a coarse catalog category
///
/// Every bound is inclusive; a missing bound is unconstrained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: String,
    #[serde(default)]
    pub min_brightness: Option<f32>,
    #[serde(default)]
    pub max_brightness: Option<f32>,
    #[serde(default)]
    pub min_contrast: Option<f32>,
    #[serde(default)]
    pub max_contrast: Option<f32>,
}

impl CategoryRule {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            min_brightness: None,
            max_brightness: None,
            min_contrast: None,
            max_contrast: None,
        }
    }

    #[must_use]
    pub fn brightness(mut self, min: f32, max: f32) -> Self {
        self.min_brightness = Some(min);
        self.max_brightness = Some(max);
        self
    }

    #[must_use]
    pub fn contrast(mut self, min: f32, max: f32) -> Self {
        self.min_contrast = Some(min);
        self.max_contrast = Some(max);
        self
    }

    pub fn matches(&self, tone: &ToneSummary) -> bool {
        let within = |value: f32, min: Option<f32>, max: Option<f32>| {
            min.map_or(true, |m| value >= m) && max.map_or(true, |m| value <= m)
        };
        within(tone.mean_brightness(), self.min_brightness, self.max_brightness)
            && within(tone.contrast, self.min_contrast, self.max_contrast)
    }
}

/// Configuration for ranking and matching
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Added when the query category matches the candidate's
    pub category_boost: f32,
    /// Multiplier of the price relevance bonus
    pub price_weight: f32,
    /// Results below this score are dropped
    pub min_score: f32,
    /// Scores this close to a run's head are reordered by tie-breakers
    pub tie_band: f32,
    /// Price tie-breaker prefers candidates close to this price
    pub reference_price: f64,
    /// Results kept from each category partition
    pub per_category_top: usize,
    /// Global results whose average price seeds the price-aware strategy
    pub price_seed_count: usize,
    /// Relative distance from the seed price still accepted by the price-aware strategy
    pub price_tolerance: f64,
    pub strategy_weights: StrategyWeights,
    /// Tone rules used to infer a query category, first match wins
    pub category_rules: Vec<CategoryRule>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            category_boost: 0.1,
            price_weight: 0.05,
            min_score: 0.15,
            tie_band: 0.05,
            reference_price: 100.0,
            per_category_top: 2,
            price_seed_count: 5,
            price_tolerance: 0.5,
            strategy_weights: StrategyWeights::default(),
            category_rules: default_category_rules(),
        }
    }
}

/// Coarse tone bands: dark, bright, then high-contrast
pub fn default_category_rules() -> Vec<CategoryRule> {
    vec![
        CategoryRule::new("dark").brightness(0.0, 0.25),
        CategoryRule::new("bright").brightness(0.75, 1.0),
        CategoryRule {
            min_contrast: Some(0.15),
            ..CategoryRule::new("high-contrast")
        },
    ]
}

impl MatchConfig {
    pub fn validate(&self) -> Result<()> {
        let non_negative = [
            ("category_boost", self.category_boost as f64),
            ("price_weight", self.price_weight as f64),
            ("min_score", self.min_score as f64),
            ("tie_band", self.tie_band as f64),
            ("price_tolerance", self.price_tolerance),
            ("strategy_weights.global", self.strategy_weights.global as f64),
            ("strategy_weights.category", self.strategy_weights.category as f64),
            ("strategy_weights.price", self.strategy_weights.price as f64),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConfig(format!("{} must be a non-negative number", name)));
            }
        }
        if self.category_rules.iter().any(|r| r.category.trim().is_empty()) {
            return Err(Error::InvalidConfig("category rule with empty category".to_string()));
        }
        Ok(())
    }

    /// Coarse category of a fingerprint according to `category_rules`
    pub fn infer_category(&self, fingerprint: &Fingerprint) -> Option<&str> {
        self.category_rules
            .iter()
            .find(|rule| rule.matches(fingerprint.tone()))
            .map(|rule| rule.category.as_str())
    }
}
