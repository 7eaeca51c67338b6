//! # pixmatch Similarity
//!
//! Similarity scoring and multi-strategy ranking over pixmatch fingerprints.
//!
//! ## Features
//!
//! - **Combined similarity**: `0.5 cosine + 0.3 euclidean + 0.2 |correlation|`, clamped to [0, 1]
//! - **Base matching**: category boost, price relevance bonus, tie-breaking and a score floor
//! - **Multi-strategy ranking**: global, per-category and price-aware passes, merged and re-weighted
//! - **Explainability**: every match keeps its strategy and per-metric breakdown
//!
//! ## Example
//!
//! ```rust
//! use pixmatch_core::{CatalogItem, Fingerprint, ToneSummary, FINGERPRINT_DIM};
//! use pixmatch_similarity::{combined_similarity, Matcher, Query};
//!
//! let values: Vec<f32> = (0..FINGERPRINT_DIM).map(|i| (i % 7) as f32 / 7.0).collect();
//! let fingerprint = Fingerprint::new(values, ToneSummary::default()).unwrap();
//! assert_eq!(combined_similarity(fingerprint.as_slice(), fingerprint.as_slice()), 1.0);
//!
//! let catalog = vec![CatalogItem::new("sku-1", fingerprint.clone(), "shoes", 49.0)];
//! let outcome = Matcher::default().rank(&Query::new(fingerprint).with_category("shoes"), &catalog, 5);
//! assert_eq!(outcome.top().unwrap().score, 1.0);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Query     │────>│ Base match  │────>│  Strategies │
//! │ fingerprint │     │ (score/tie) │     │ global/cat/ │
//! └─────────────┘     └─────────────┘     │   price     │
//!                                         └─────────────┘
//!                                                │
//!                     ┌─────────────┐     ┌─────────────┐
//!                     │ Confidence  │<────│    Merge    │
//!                     │  + stats    │     │ dedup/weight│
//!                     └─────────────┘     └─────────────┘
//! ```

pub mod config;
pub mod distance;
pub mod explain;
pub mod rerank;
pub mod strategy;

// Re-export main types for convenience
pub use config::{default_category_rules, CategoryRule, MatchConfig, StrategyWeights};
pub use distance::{
    combined_similarity, correlation_similarity, cosine_similarity, euclidean_similarity, similarity_breakdown,
    SimilarityBreakdown,
};
pub use explain::{MatchStrategy, RankedMatch, RankingOutcome, RankingStats};
pub use rerank::{average_price, price_relevance, Matcher, Query};
pub use strategy::{confidence, merge, rank_candidates};
