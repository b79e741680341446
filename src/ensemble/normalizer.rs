//! Per-call score normalization.

use ahash::AHashMap;

use crate::error::{Result, VimojiError};
use crate::scorer::ScoreVector;

/// Scores rescaled into `[0, 1]`.
///
/// Produced by [`ScoreNormalizer::normalize`], in which case the maximum is
/// exactly 1.0 unless every input was zero. [`NormalizedVector::new`] accepts
/// any vector already in range.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedVector {
    scores: AHashMap<String, f32>,
}

impl NormalizedVector {
    /// Wrap scores that are already within `[0, 1]`.
    pub fn new(scores: ScoreVector) -> Result<Self> {
        if let Some((symbol, value)) = scores
            .iter()
            .find(|(_, value)| !(0.0..=1.0).contains(*value))
        {
            return Err(VimojiError::invalid_argument(format!(
                "normalized score for '{symbol}' is out of range: {value}"
            )));
        }
        Ok(Self { scores })
    }

    /// Score of `symbol`, zero when absent.
    pub fn get(&self, symbol: &str) -> f32 {
        self.scores.get(symbol).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.scores.iter().map(|(symbol, value)| (symbol.as_str(), *value))
    }

    pub fn as_scores(&self) -> &ScoreVector {
        &self.scores
    }

    pub fn into_scores(self) -> ScoreVector {
        self.scores
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Largest score, 0.0 for an empty vector.
    pub fn max(&self) -> f32 {
        self.scores.values().copied().fold(0.0, f32::max)
    }
}

/// Rescales each scorer's raw output by its maximum.
///
/// Negative and non-finite raw values are clamped to zero first, so cosine
/// similarities below zero never count against an emoji.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreNormalizer;

impl ScoreNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Divide every value by the maximum. Empty or all-zero input yields all
    /// zeros.
    pub fn normalize(&self, scores: &ScoreVector) -> NormalizedVector {
        let clamped = scores.iter().map(|(symbol, &value)| {
            let value = if value.is_finite() && value > 0.0 {
                value
            } else {
                0.0
            };
            (symbol, value)
        });

        let max = clamped.clone().map(|(_, value)| value).fold(0.0, f32::max);
        let scores = clamped
            .map(|(symbol, value)| {
                let normalized = if max > 0.0 { value / max } else { 0.0 };
                (symbol.clone(), normalized)
            })
            .collect();

        NormalizedVector { scores }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(entries: &[(&str, f32)]) -> ScoreVector {
        entries.iter().map(|(s, v)| (s.to_string(), *v)).collect()
    }

    #[test]
    fn test_max_becomes_one() {
        let normalized = ScoreNormalizer::new().normalize(&vector(&[("😊", 2.0), ("🎉", 0.5)]));
        assert_eq!(normalized.get("😊"), 1.0);
        assert_eq!(normalized.get("🎉"), 0.25);
        assert_eq!(normalized.max(), 1.0);
    }

    #[test]
    fn test_all_zero_and_empty() {
        let normalizer = ScoreNormalizer::new();
        let zeros = normalizer.normalize(&vector(&[("😊", 0.0), ("🎉", 0.0)]));
        assert_eq!(zeros.len(), 2);
        assert!(zeros.iter().all(|(_, v)| v == 0.0));

        assert!(normalizer.normalize(&ScoreVector::new()).is_empty());
    }

    #[test]
    fn test_negative_and_non_finite_are_clamped() {
        let normalized = ScoreNormalizer::new().normalize(&vector(&[
            ("😊", 0.4),
            ("😢", -0.9),
            ("🎉", f32::NAN),
            ("🥳", f32::INFINITY),
        ]));
        assert_eq!(normalized.get("😊"), 1.0);
        assert_eq!(normalized.get("😢"), 0.0);
        assert_eq!(normalized.get("🎉"), 0.0);
        assert_eq!(normalized.get("🥳"), 0.0);
    }

    #[test]
    fn test_only_negative_scores_give_zeros() {
        let normalized = ScoreNormalizer::new().normalize(&vector(&[("😊", -0.2), ("😢", -0.1)]));
        assert_eq!(normalized.max(), 0.0);
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(NormalizedVector::new(vector(&[("😊", 0.8)])).is_ok());
        assert!(NormalizedVector::new(vector(&[("😊", 1.5)])).is_err());
        assert!(NormalizedVector::new(vector(&[("😊", f32::NAN)])).is_err());
    }
}
