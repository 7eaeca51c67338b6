//! Ranking results and their explanations
//!
//! Every match keeps the strategy that produced it, the inputs of the
//! tie-breakers and the per-metric similarity breakdown.

use crate::distance::SimilarityBreakdown;
use pixmatch_core::ItemId;
use serde::{Deserialize, Serialize};

/// Which ranking strategy produced a match, in merge priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    Global,
    Category,
    Price,
}

impl std::fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchStrategy::Global => write!(f, "global"),
            MatchStrategy::Category => write!(f, "category"),
            MatchStrategy::Price => write!(f, "price"),
        }
    }
}

/// A scored catalog item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedMatch {
    pub id: ItemId,
    /// Final score after boosts and strategy weighting
    pub score: f32,
    pub strategy: MatchStrategy,
    pub category: String,
    /// Whether the candidate's category matched the query category
    pub category_match: bool,
    pub price: f64,
    /// Raw fingerprint similarity before boosts
    pub similarity: SimilarityBreakdown,
}

/// Summary counts for one ranking call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankingStats {
    /// Number of candidates considered
    pub candidates_count: usize,
    pub global_count: usize,
    pub category_count: usize,
    pub price_count: usize,
    /// Number of results returned
    pub results_count: usize,
    /// Category used for boosting, explicit or inferred
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_category: Option<String>,
}

/// Merged ranking with its confidence estimate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankingOutcome {
    pub matches: Vec<RankedMatch>,
    pub confidence: f32,
    pub stats: RankingStats,
}

impl RankingOutcome {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn top(&self) -> Option<&RankedMatch> {
        self.matches.first()
    }
}
