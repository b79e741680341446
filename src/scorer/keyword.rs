//! Keyword scorer.

use std::sync::Arc;

use crate::analysis::normalize_text;
use crate::catalog::{EmojiCatalog, KeywordEntry};
use crate::error::Result;
use crate::scorer::Scorer;
use crate::scorer::types::{Evidence, ScoreReport, ScoreVector, ScorerKind};

/// Scores emojis by looking up catalog keyword phrases in the text.
///
/// For every keyword phrase found as a substring of the normalized text, the
/// emoji at position `i` of the entry's list gains `1 / (1 + i)`. Emojis
/// reached through several phrases accumulate their contributions.
#[derive(Debug, Clone)]
pub struct KeywordScorer {
    catalog: Arc<EmojiCatalog>,
}

impl KeywordScorer {
    pub fn new(catalog: Arc<EmojiCatalog>) -> Self {
        Self { catalog }
    }

    /// Keyword entries whose phrase occurs in `text`, in catalog order.
    pub fn matched_keywords(&self, text: &str) -> Vec<&KeywordEntry> {
        let normalized = normalize_text(text);
        self.matches_in(&normalized)
    }

    fn matches_in(&self, normalized: &str) -> Vec<&KeywordEntry> {
        if normalized.is_empty() {
            return Vec::new();
        }
        self.catalog
            .keywords()
            .iter()
            .filter(|entry| normalized.contains(entry.phrase.as_str()))
            .collect()
    }

    fn accumulate(entries: &[&KeywordEntry]) -> ScoreVector {
        let mut scores = ScoreVector::new();
        for entry in entries {
            for (position, symbol) in entry.emojis.iter().enumerate() {
                *scores.entry(symbol.clone()).or_insert(0.0) += 1.0 / (1 + position) as f32;
            }
        }
        scores
    }
}

impl Scorer for KeywordScorer {
    fn score(&self, text: &str) -> Result<ScoreVector> {
        let normalized = normalize_text(text);
        Ok(Self::accumulate(&self.matches_in(&normalized)))
    }

    fn kind(&self) -> ScorerKind {
        ScorerKind::Keyword
    }

    fn score_detailed(&self, text: &str) -> Result<ScoreReport> {
        let normalized = normalize_text(text);
        let matched = self.matches_in(&normalized);
        let phrases = matched.iter().map(|entry| entry.phrase.clone()).collect();
        Ok(ScoreReport::new(Self::accumulate(&matched))
            .with_evidence(Evidence::Keywords { phrases }))
    }
}
