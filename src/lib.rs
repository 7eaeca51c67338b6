//! # pixmatch
//!
//! Visual fingerprinting and catalog ranking.
//!
//! pixmatch turns an image into a fixed-length fingerprint built from seven
//! closed-form features (color histogram, edges, texture, shape, dominant
//! colors, brightness and contrast) and ranks a catalog of fingerprinted items
//! by visual similarity to a query.
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! pixmatch fingerprint shoe.png > shoe.json
//! pixmatch compare shoe.png boot.png
//! pixmatch rank --query shoe.png --catalog catalog.json --limit 5
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use pixmatch::prelude::*;
//!
//! let pipeline = FeaturePipeline::new(PipelineConfig {
//!     canonical_size: 32,
//!     analysis_size: 16,
//!     ..Default::default()
//! })
//! .unwrap();
//!
//! let red = pipeline.extract_fingerprint(&PixelBuffer::solid_rgb(40, 40, [200, 20, 20]).unwrap()).unwrap();
//! let blue = pipeline.extract_fingerprint(&PixelBuffer::solid_rgb(40, 40, [20, 20, 200]).unwrap()).unwrap();
//! assert_eq!(red.dim(), FINGERPRINT_DIM);
//!
//! let catalog = vec![
//!     CatalogItem::new("red", red.clone(), "shirts", 25.0),
//!     CatalogItem::new("blue", blue, "shirts", 30.0),
//! ];
//! let outcome = Matcher::default().rank(&Query::new(red), &catalog, 2);
//! assert_eq!(outcome.top().unwrap().id.to_string(), "red");
//! ```
//!
//! ## Crate Structure
//!
//! - `pixmatch-core` - Shared types (PixelBuffer, Fingerprint, CatalogItem, PriceBucket)
//! - `pixmatch-vision` - Resampling, the seven feature extractors and the combiner
//! - `pixmatch-similarity` - Similarity metrics, base matching and multi-strategy ranking

pub mod catalog;
pub mod config;

pub use catalog::{load_catalog, read_entries, CatalogEntry};
pub use config::AppConfig;

// Re-export core types
pub use pixmatch_core::{
    CatalogItem, ColorMode, Error, FeatureVector, Fingerprint, ItemId, PixelBuffer, PriceBucket, Result,
    ToneSummary, FINGERPRINT_DIM,
};

// Re-export vision
pub use pixmatch_vision::{
    FeatureKind, FeaturePipeline, FeatureReport, FeatureWeights, ImageResampler, PipelineConfig, Resampler,
};

// Re-export similarity
pub use pixmatch_similarity::{
    combined_similarity, rank_candidates, similarity_breakdown, MatchConfig, MatchStrategy, Matcher, Query,
    RankedMatch, RankingOutcome, RankingStats, SimilarityBreakdown,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        combined_similarity, rank_candidates, similarity_breakdown, AppConfig, CatalogItem, ColorMode, Error,
        FeaturePipeline, Fingerprint, ItemId, MatchConfig, Matcher, PipelineConfig, PixelBuffer, PriceBucket,
        Query, RankingOutcome, Result, SimilarityBreakdown, FINGERPRINT_DIM,
    };
}
