//! Multi-strategy ranking
//!
//! The base matcher runs over three candidate subsets:
//!
//! 1. **global**: the whole candidate set
//! 2. **category**: each category partition on its own, keeping its top entries
//! 3. **price**: candidates priced like the best global matches
//!
//! The outputs are merged with duplicates removed (first strategy wins),
//! rescaled by strategy weight, filtered, sorted and truncated. A confidence
//! estimate summarizes the merged list.

use crate::config::MatchConfig;
use crate::explain::{MatchStrategy, RankedMatch, RankingOutcome, RankingStats};
use crate::rerank::{Matcher, Query};
use ahash::{AHashMap, AHashSet};
use ordered_float::OrderedFloat;
use pixmatch_core::{CatalogItem, Fingerprint, ItemId, PriceBucket};
use tracing::debug;

impl Matcher {
    /// Rank `candidates` for `query`, returning at most `limit` merged matches
    pub fn rank(&self, query: &Query, candidates: &[CatalogItem], limit: usize) -> RankingOutcome {
        if candidates.is_empty() || limit == 0 {
            return RankingOutcome::empty();
        }

        let config = self.config();
        let all: Vec<&CatalogItem> = candidates.iter().collect();

        let global_limit = limit.max(config.price_seed_count);
        let global = self.base_match(query, &all, global_limit, MatchStrategy::Global);
        let category = self.category_matches(query, &all);
        let price = self.price_matches(query, &all, &global, limit);

        let mut stats = RankingStats {
            candidates_count: candidates.len(),
            global_count: global.len(),
            category_count: category.len(),
            price_count: price.len(),
            results_count: 0,
            query_category: self.query_category(query).map(str::to_string),
        };

        let matches = merge(config, [global, category, price], limit);
        let confidence = confidence(&matches);
        stats.results_count = matches.len();

        debug!(
            candidates = stats.candidates_count,
            global = stats.global_count,
            category = stats.category_count,
            price = stats.price_count,
            results = stats.results_count,
            confidence,
            "ranked catalog"
        );

        RankingOutcome {
            matches,
            confidence,
            stats,
        }
    }

    /// Top entries of every category partition, partitions in first-appearance order
    fn category_matches(&self, query: &Query, candidates: &[&CatalogItem]) -> Vec<RankedMatch> {
        let mut order: Vec<String> = Vec::new();
        let mut partitions: AHashMap<String, Vec<&CatalogItem>> = AHashMap::new();
        for &candidate in candidates {
            let key = candidate.category.to_lowercase();
            partitions
                .entry(key)
                .or_insert_with_key(|k| {
                    order.push(k.clone());
                    Vec::new()
                })
                .push(candidate);
        }

        let top = self.config().per_category_top;
        order
            .iter()
            .filter_map(|key| partitions.get(key))
            .flat_map(|members| self.base_match(query, members, top, MatchStrategy::Category))
            .collect()
    }

    /// Candidates in the seed price bucket, or within tolerance of the seed price
    fn price_matches(
        &self,
        query: &Query,
        candidates: &[&CatalogItem],
        global: &[RankedMatch],
        limit: usize,
    ) -> Vec<RankedMatch> {
        let config = self.config();
        let seeds: Vec<f64> = global.iter().take(config.price_seed_count).map(|m| m.price).collect();
        if seeds.is_empty() {
            return Vec::new();
        }

        let seed_price = seeds.iter().sum::<f64>() / seeds.len() as f64;
        let seed_bucket = PriceBucket::of(seed_price);
        let tolerance = config.price_tolerance * seed_price.abs();

        let priced: Vec<&CatalogItem> = candidates
            .iter()
            .copied()
            .filter(|c| c.price_bucket() == seed_bucket || (c.price - seed_price).abs() <= tolerance)
            .collect();

        self.base_match(query, &priced, limit, MatchStrategy::Price)
    }
}

/// Dedup (first occurrence wins), rescale by strategy weight, filter, sort, truncate
pub fn merge<I>(config: &MatchConfig, strategies: I, limit: usize) -> Vec<RankedMatch>
where
    I: IntoIterator<Item = Vec<RankedMatch>>,
{
    let mut seen: AHashSet<ItemId> = AHashSet::new();
    let mut merged: Vec<RankedMatch> = strategies
        .into_iter()
        .flatten()
        .filter(|m| seen.insert(m.id.clone()))
        .map(|mut m| {
            m.score *= config.strategy_weights.get(m.strategy);
            m
        })
        .filter(|m| m.score >= config.min_score)
        .collect();

    merged.sort_by_key(|m| std::cmp::Reverse(OrderedFloat(m.score)));
    merged.truncate(limit);
    merged
}

/// `0.5 min(2 top, 1) + 0.3 max(0, 1 - 10 var) + 0.2 min(n / 10, 1)`, 0 for no matches
pub fn confidence(matches: &[RankedMatch]) -> f32 {
    if matches.is_empty() {
        return 0.0;
    }

    let n = matches.len() as f64;
    let scores = matches.iter().map(|m| m.score as f64);
    let top = scores.clone().fold(f64::NEG_INFINITY, f64::max);
    let mean = scores.clone().sum::<f64>() / n;
    let variance = scores.map(|s| (s - mean).powi(2)).sum::<f64>() / n;

    let value = 0.5 * (2.0 * top).min(1.0) + 0.3 * (1.0 - 10.0 * variance).max(0.0) + 0.2 * (n / 10.0).min(1.0);
    value as f32
}

/// Rank with default settings and a custom category boost
///
/// The query category is inferred from the fingerprint's tone through the
/// default rules, so the boost goes to candidates filed under `dark`,
/// `bright` or `high-contrast` when the query falls in that band.
pub fn rank_candidates(
    query: &Fingerprint,
    candidates: &[CatalogItem],
    limit: usize,
    category_boost: f32,
) -> RankingOutcome {
    let config = MatchConfig {
        category_boost: category_boost.max(0.0),
        ..Default::default()
    };
    Matcher::new(config)
        .unwrap_or_default()
        .rank(&Query::new(query.clone()), candidates, limit)
}
