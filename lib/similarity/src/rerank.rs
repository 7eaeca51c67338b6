//! Base matcher: scores candidates against a query fingerprint
//!
//! Each candidate gets the combined fingerprint similarity, an optional
//! category boost and an optional price relevance bonus. Results are sorted,
//! near-ties are broken by category match and price, low scores are dropped
//! and the list is truncated.

use crate::config::MatchConfig;
use crate::distance::similarity_breakdown;
use crate::explain::{MatchStrategy, RankedMatch};
use ordered_float::OrderedFloat;
use pixmatch_core::{CatalogItem, Fingerprint, Result};
use rayon::prelude::*;
use std::cmp::Ordering;

/// A query image fingerprint with an optional explicit category
#[derive(Debug, Clone)]
pub struct Query {
    pub fingerprint: Fingerprint,
    pub category: Option<String>,
}

impl Query {
    pub fn new(fingerprint: Fingerprint) -> Self {
        Self {
            fingerprint,
            category: None,
        }
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

impl From<Fingerprint> for Query {
    fn from(fingerprint: Fingerprint) -> Self {
        Query::new(fingerprint)
    }
}

/// Mean price of the candidates, 0 for an empty set
pub fn average_price(candidates: &[&CatalogItem]) -> f64 {
    if candidates.is_empty() {
        return 0.0;
    }
    candidates.iter().map(|c| c.price).sum::<f64>() / candidates.len() as f64
}

/// `max(0, 1 - |price - average| / average)`, 0 when the average is not positive
pub fn price_relevance(price: f64, average: f64) -> f64 {
    if average <= 0.0 || !average.is_finite() {
        return 0.0;
    }
    (1.0 - (price - average).abs() / average).max(0.0)
}

fn by_score_desc(a: &RankedMatch, b: &RankedMatch) -> Ordering {
    OrderedFloat(b.score).cmp(&OrderedFloat(a.score))
}

/// Scores candidates for a query under a [`MatchConfig`]
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    config: MatchConfig,
}

impl Matcher {
    pub fn new(config: MatchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// The explicit query category, or one inferred from the query's tone
    pub fn query_category<'q>(&'q self, query: &'q Query) -> Option<&'q str> {
        query
            .category
            .as_deref()
            .or_else(|| self.config.infer_category(&query.fingerprint))
    }

    /// Score, sort, tie-break, filter and truncate one candidate subset
    pub fn base_match(
        &self,
        query: &Query,
        candidates: &[&CatalogItem],
        limit: usize,
        strategy: MatchStrategy,
    ) -> Vec<RankedMatch> {
        if candidates.is_empty() || limit == 0 {
            return Vec::new();
        }

        let category = self.query_category(query);
        let average = average_price(candidates);

        let mut matches: Vec<RankedMatch> = candidates
            .par_iter()
            .map(|candidate| self.score_candidate(query, candidate, category, average, strategy))
            .collect();

        matches.sort_by(by_score_desc);
        self.break_ties(&mut matches);

        matches.retain(|m| m.score >= self.config.min_score);
        matches.truncate(limit);
        matches
    }

    fn score_candidate(
        &self,
        query: &Query,
        candidate: &CatalogItem,
        category: Option<&str>,
        average_price: f64,
        strategy: MatchStrategy,
    ) -> RankedMatch {
        let similarity = similarity_breakdown(query.fingerprint.as_slice(), candidate.fingerprint.as_slice());
        let category_match = category.map_or(false, |c| candidate.in_category(c));

        let mut score = similarity.combined;
        if category_match {
            score += self.config.category_boost;
        }
        if self.config.price_weight > 0.0 {
            score += self.config.price_weight * price_relevance(candidate.price, average_price) as f32;
        }

        RankedMatch {
            id: candidate.id.clone(),
            score: score.min(1.0),
            strategy,
            category: candidate.category.clone(),
            category_match,
            price: candidate.price,
            similarity,
        }
    }

    /// Reorder runs of near-equal scores
    ///
    /// A run starts at the highest remaining score and extends over every
    /// following entry within `tie_band` of it. Inside a run, category matches
    /// come first, then prices closer to `reference_price`, then higher scores.
    /// `matches` must already be sorted by descending score.
    pub fn break_ties(&self, matches: &mut [RankedMatch]) {
        let band = self.config.tie_band;
        let reference = self.config.reference_price;

        let mut start = 0;
        while start < matches.len() {
            let head = matches[start].score;
            let mut end = start + 1;
            while end < matches.len() && head - matches[end].score <= band {
                end += 1;
            }

            matches[start..end].sort_by(|a, b| {
                b.category_match
                    .cmp(&a.category_match)
                    .then_with(|| {
                        OrderedFloat((a.price - reference).abs()).cmp(&OrderedFloat((b.price - reference).abs()))
                    })
                    .then_with(|| by_score_desc(a, b))
            });
            start = end;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixmatch_core::{ToneSummary, FINGERPRINT_DIM};

    /// Fingerprint whose first values follow `pattern`, the rest a fixed ramp
    fn fingerprint(pattern: &[f32]) -> Fingerprint {
        let mut values: Vec<f32> = (0..FINGERPRINT_DIM).map(|i| (i % 17) as f32 / 17.0).collect();
        values[..pattern.len()].copy_from_slice(pattern);
        Fingerprint::new(values, ToneSummary::default()).unwrap()
    }

    fn item(id: &str, fp: Fingerprint, category: &str, price: f64) -> CatalogItem {
        CatalogItem::new(id, fp, category, price)
    }

    fn quiet_matcher() -> Matcher {
        Matcher::new(MatchConfig {
            price_weight: 0.0,
            ..Default::default()
        })
        .unwrap()
    }

    fn ranked(id: &str, score: f32, category_match: bool, price: f64) -> RankedMatch {
        RankedMatch {
            id: id.into(),
            score,
            strategy: MatchStrategy::Global,
            category: String::new(),
            category_match,
            price,
            similarity: Default::default(),
        }
    }

    #[test]
    fn test_price_relevance() {
        assert_eq!(price_relevance(100.0, 100.0), 1.0);
        assert_eq!(price_relevance(150.0, 100.0), 0.5);
        assert_eq!(price_relevance(300.0, 100.0), 0.0);
        assert_eq!(price_relevance(10.0, 0.0), 0.0);
    }

    #[test]
    fn test_average_price() {
        let fp = Fingerprint::zeroed();
        let a = item("a", fp.clone(), "x", 10.0);
        let b = item("b", fp, "x", 30.0);
        assert_eq!(average_price(&[&a, &b]), 20.0);
        assert_eq!(average_price(&[]), 0.0);
    }

    #[test]
    fn test_exact_match_ranks_first_with_score_one() {
        let query_fp = fingerprint(&[0.9, 0.1, 0.5]);
        let exact = item("exact", query_fp.clone(), "shoes", 80.0);
        let other = item("other", fingerprint(&[0.0, 0.9, 0.0]), "shoes", 80.0);

        let matcher = quiet_matcher();
        let results = matcher.base_match(&Query::new(query_fp), &[&other, &exact], 10, MatchStrategy::Global);

        assert_eq!(results[0].id.to_string(), "exact");
        assert_eq!(results[0].score, 1.0);
    }

    #[test]
    fn test_category_boost_applies_case_insensitively() {
        let query_fp = fingerprint(&[0.3, 0.3]);
        let shoe = item("shoe", fingerprint(&[0.1, 0.9]), "Shoes", 50.0);
        let matcher = quiet_matcher();

        let plain = matcher.base_match(&Query::new(query_fp.clone()), &[&shoe], 5, MatchStrategy::Global);
        let boosted = matcher.base_match(
            &Query::new(query_fp).with_category("shoes"),
            &[&shoe],
            5,
            MatchStrategy::Global,
        );

        assert!(!plain[0].category_match);
        assert!(boosted[0].category_match);
        let expected = (plain[0].score + 0.1).min(1.0);
        assert!((boosted[0].score - expected).abs() < 1e-6);
    }

    #[test]
    fn test_price_bonus() {
        let query_fp = fingerprint(&[0.3, 0.3]);
        let cand_fp = fingerprint(&[0.2, 0.6]);
        let on_average = item("avg", cand_fp.clone(), "x", 100.0);
        let far = item("far", cand_fp, "x", 300.0);
        // average is 200: both at relevance 0.5
        let matcher = Matcher::default();
        let results = matcher.base_match(&Query::new(query_fp.clone()), &[&on_average, &far], 5, MatchStrategy::Global);
        let base = crate::distance::combined_similarity(query_fp.as_slice(), on_average.fingerprint.as_slice());
        for r in &results {
            assert!((r.score - (base + 0.025).min(1.0)).abs() < 1e-6);
        }
    }

    #[test]
    fn test_floor_and_limit() {
        let query_fp = fingerprint(&[1.0; 64]);
        let items: Vec<CatalogItem> = (0..8)
            .map(|i| item(&format!("i{}", i), fingerprint(&[i as f32 / 8.0; 64]), "x", 50.0))
            .collect();
        let refs: Vec<&CatalogItem> = items.iter().collect();

        let matcher = quiet_matcher();
        let results = matcher.base_match(&Query::new(query_fp), &refs, 3, MatchStrategy::Global);
        assert!(results.len() <= 3);
        for r in &results {
            assert!(r.score >= 0.15);
        }
        for w in results.windows(2) {
            assert!(w[0].score + matcher.config().tie_band >= w[1].score);
        }
    }

    #[test]
    fn test_everything_below_floor_is_dropped() {
        let matcher = Matcher::new(MatchConfig {
            min_score: 0.99,
            price_weight: 0.0,
            ..Default::default()
        })
        .unwrap();
        let far = item("far", fingerprint(&[5.0; 32]), "x", 10.0);
        let results = matcher.base_match(&Query::new(fingerprint(&[0.0; 32])), &[&far], 5, MatchStrategy::Global);
        assert!(results.is_empty());
    }

    #[test]
    fn test_empty_candidates() {
        let matcher = Matcher::default();
        assert!(matcher
            .base_match(&Query::new(Fingerprint::zeroed()), &[], 5, MatchStrategy::Global)
            .is_empty());
    }

    #[test]
    fn test_tie_break_prefers_category_then_price() {
        let matcher = quiet_matcher();
        let mut matches = vec![
            ranked("a", 0.90, false, 100.0),
            ranked("b", 0.88, true, 400.0),
            ranked("c", 0.87, true, 110.0),
            ranked("d", 0.70, true, 100.0),
        ];
        matcher.break_ties(&mut matches);

        let order: Vec<String> = matches.iter().map(|m| m.id.to_string()).collect();
        assert_eq!(order, vec!["c", "b", "a", "d"]);
    }

    #[test]
    fn test_tie_break_keeps_distinct_scores() {
        let matcher = quiet_matcher();
        let mut matches = vec![
            ranked("a", 0.9, false, 500.0),
            ranked("b", 0.6, true, 100.0),
            ranked("c", 0.3, true, 100.0),
        ];
        matcher.break_ties(&mut matches);
        let order: Vec<String> = matches.iter().map(|m| m.id.to_string()).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }
}
