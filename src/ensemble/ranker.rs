//! Top-k ranking with deterministic tie-breaking.

use std::cmp::Ordering;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::EmojiCatalog;
use crate::ensemble::types::{ScoredEmoji, Suggestion};
use crate::scorer::ScoreVector;

/// What to do when fewer than `k` emojis have a nonzero score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaddingPolicy {
    /// Return only the nonzero-scored emojis, possibly fewer than `k`.
    #[default]
    None,
    /// Fill up to `k` with the earliest catalog emojis at score 0.
    Catalog,
}

/// Catalog emojis with a positive finite score, best first.
///
/// Ties go to the emoji registered earlier in the catalog. Symbols that are
/// not registered are dropped.
pub fn order_by_score<'a>(catalog: &EmojiCatalog, scores: &'a ScoreVector) -> Vec<(&'a str, f32)> {
    let mut ranked: Vec<(usize, &str, f32)> = scores
        .iter()
        .filter(|(_, score)| score.is_finite() && **score > 0.0)
        .filter_map(|(symbol, score)| {
            catalog
                .position(symbol)
                .map(|position| (position, symbol.as_str(), *score))
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.2.partial_cmp(&a.2)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });

    ranked
        .into_iter()
        .map(|(_, symbol, score)| (symbol, score))
        .collect()
}

/// Sorts combined scores and cuts them to `k`.
#[derive(Debug, Clone)]
pub struct Ranker {
    catalog: Arc<EmojiCatalog>,
    padding: PaddingPolicy,
}

impl Ranker {
    pub fn new(catalog: Arc<EmojiCatalog>, padding: PaddingPolicy) -> Self {
        Self { catalog, padding }
    }

    pub fn padding(&self) -> PaddingPolicy {
        self.padding
    }

    /// Rank `scores` and keep at most `k` entries.
    pub fn rank(&self, scores: &ScoreVector, k: usize) -> Suggestion {
        let mut emojis: Vec<ScoredEmoji> = order_by_score(&self.catalog, scores)
            .into_iter()
            .take(k)
            .map(|(symbol, score)| ScoredEmoji::new(symbol, score))
            .collect();

        if self.padding == PaddingPolicy::Catalog && emojis.len() < k {
            let missing = k - emojis.len();
            let padding: Vec<ScoredEmoji> = self
                .catalog
                .candidates()
                .iter()
                .filter(|candidate| !emojis.iter().any(|e| e.symbol == candidate.symbol))
                .take(missing)
                .map(|candidate| ScoredEmoji::new(candidate.symbol.clone(), 0.0))
                .collect();
            emojis.extend(padding);
        }

        Suggestion::new(emojis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Arc<EmojiCatalog> {
        Arc::new(EmojiCatalog::builtin().unwrap())
    }

    fn vector(entries: &[(&str, f32)]) -> ScoreVector {
        entries.iter().map(|(s, v)| (s.to_string(), *v)).collect()
    }

    #[test]
    fn test_sorted_and_truncated() {
        let ranker = Ranker::new(catalog(), PaddingPolicy::None);
        let scores = vector(&[("😢", 0.2), ("😊", 0.9), ("🎉", 0.5), ("🥳", 0.4)]);
        let suggestion = ranker.rank(&scores, 3);
        assert_eq!(suggestion.symbols(), vec!["😊", "🎉", "🥳"]);
    }

    #[test]
    fn test_ties_follow_catalog_order() {
        let ranker = Ranker::new(catalog(), PaddingPolicy::None);
        // Catalog order: 😊, 😄, 😁, ... 🥳, 🎉
        let scores = vector(&[("🎉", 0.5), ("🥳", 0.5), ("😄", 0.5)]);
        assert_eq!(ranker.rank(&scores, 3).symbols(), vec!["😄", "🥳", "🎉"]);
    }

    #[test]
    fn test_no_padding_drops_zeros() {
        let ranker = Ranker::new(catalog(), PaddingPolicy::None);
        let scores = vector(&[("😊", 0.7), ("🎉", 0.0)]);
        let suggestion = ranker.rank(&scores, 3);
        assert_eq!(suggestion.symbols(), vec!["😊"]);
    }

    #[test]
    fn test_catalog_padding_fills_k() {
        let ranker = Ranker::new(catalog(), PaddingPolicy::Catalog);
        let scores = vector(&[("🎉", 0.7)]);
        let suggestion = ranker.rank(&scores, 3);
        assert_eq!(suggestion.symbols(), vec!["🎉", "😊", "😄"]);
        assert_eq!(suggestion.emojis()[1].score, 0.0);
    }

    #[test]
    fn test_catalog_padding_on_empty_scores() {
        let ranker = Ranker::new(catalog(), PaddingPolicy::Catalog);
        let suggestion = ranker.rank(&ScoreVector::new(), 2);
        assert_eq!(suggestion.symbols(), vec!["😊", "😄"]);
    }

    #[test]
    fn test_unknown_symbols_are_dropped() {
        let ranker = Ranker::new(catalog(), PaddingPolicy::None);
        let scores = vector(&[("not-an-emoji", 1.0), ("😊", 0.1)]);
        assert_eq!(ranker.rank(&scores, 3).symbols(), vec!["😊"]);
    }

    #[test]
    fn test_k_zero() {
        let ranker = Ranker::new(catalog(), PaddingPolicy::Catalog);
        assert!(ranker.rank(&vector(&[("😊", 1.0)]), 0).is_empty());
    }
}
