//! Combination of normalized scorer outputs.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::catalog::EmojiCatalog;
use crate::ensemble::method::Method;
use crate::ensemble::normalizer::NormalizedVector;
use crate::ensemble::ranker::order_by_score;
use crate::ensemble::weights::EnsembleWeights;
use crate::error::{Result, VimojiError};
use crate::scorer::{ScoreVector, ScorerKind};

/// Number of emojis each scorer votes for.
pub const VOTES_PER_METHOD: usize = 3;

/// Result of running one scorer for a request.
#[derive(Debug, Clone, PartialEq)]
pub enum ScorerOutcome {
    Scored(NormalizedVector),
    /// The scorer failed; the message is kept for reporting.
    Failed(String),
}

impl ScorerOutcome {
    pub fn scores(&self) -> Option<&NormalizedVector> {
        match self {
            ScorerOutcome::Scored(vector) => Some(vector),
            ScorerOutcome::Failed(_) => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ScorerOutcome::Failed(_))
    }
}

/// Scorer outcomes keyed by method. Iteration is always in canonical order.
pub type Outcomes = BTreeMap<ScorerKind, ScorerOutcome>;

/// Merges per-method normalized vectors into one score per emoji.
#[derive(Debug, Clone)]
pub struct EnsembleCombiner {
    catalog: Arc<EmojiCatalog>,
    weights: EnsembleWeights,
}

impl EnsembleCombiner {
    pub fn new(catalog: Arc<EmojiCatalog>, weights: EnsembleWeights) -> Self {
        Self { catalog, weights }
    }

    pub fn weights(&self) -> &EnsembleWeights {
        &self.weights
    }

    /// Combine the outcomes of the scorers `method` uses.
    ///
    /// Outcomes of scorers the method does not use are ignored; a scorer the
    /// method uses but that has no outcome counts as inactive. Fails with
    /// [`VimojiError::NoSignal`] when no scorer of the method produced output.
    pub fn combine(&self, method: Method, outcomes: &Outcomes) -> Result<ScoreVector> {
        let active: Vec<(ScorerKind, &NormalizedVector)> = method
            .scorers()
            .iter()
            .filter_map(|kind| {
                outcomes
                    .get(kind)
                    .and_then(ScorerOutcome::scores)
                    .map(|vector| (*kind, vector))
            })
            .collect();

        if active.is_empty() {
            let failed: Vec<String> = outcomes
                .iter()
                .filter_map(|(kind, outcome)| match outcome {
                    ScorerOutcome::Failed(message) => Some(format!("{kind}: {message}")),
                    ScorerOutcome::Scored(_) => None,
                })
                .collect();
            return Err(VimojiError::no_signal(if failed.is_empty() {
                format!("no scorer produced output for method '{method}'")
            } else {
                format!("every scorer failed for method '{method}' ({})", failed.join("; "))
            }));
        }

        let combined = match method {
            Method::Keyword | Method::Sentiment | Method::Semantic => active
                .into_iter()
                .next()
                .map(|(_, vector)| vector.as_scores().clone())
                .unwrap_or_default(),
            Method::Weighted => self.weighted(&active),
            Method::Max => Self::max(&active),
            Method::Voting => self.voting(&active),
        };

        Ok(combined)
    }

    fn weighted(&self, active: &[(ScorerKind, &NormalizedVector)]) -> ScoreVector {
        let kinds: Vec<ScorerKind> = active.iter().map(|(kind, _)| *kind).collect();
        let weights = self.weights.renormalized(&kinds);

        let mut combined = ScoreVector::new();
        for (kind, vector) in active {
            let weight = weights.get(kind).copied().unwrap_or(0.0);
            for (symbol, score) in vector.iter() {
                *combined.entry(symbol.to_string()).or_insert(0.0) += weight * score;
            }
        }
        combined
    }

    fn max(active: &[(ScorerKind, &NormalizedVector)]) -> ScoreVector {
        let mut combined = ScoreVector::new();
        for (_, vector) in active {
            for (symbol, score) in vector.iter() {
                let entry = combined.entry(symbol.to_string()).or_insert(0.0);
                *entry = entry.max(score);
            }
        }
        combined
    }

    fn voting(&self, active: &[(ScorerKind, &NormalizedVector)]) -> ScoreVector {
        let mut votes = ScoreVector::new();
        for (_, vector) in active {
            for (symbol, _) in order_by_score(&self.catalog, vector.as_scores())
                .into_iter()
                .take(VOTES_PER_METHOD)
            {
                *votes.entry(symbol.to_string()).or_insert(0.0) += 1.0;
            }
        }

        let voters = active.len() as f32;
        for value in votes.values_mut() {
            *value /= voters;
        }
        votes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn combiner() -> EnsembleCombiner {
        EnsembleCombiner::new(
            Arc::new(EmojiCatalog::builtin().unwrap()),
            EnsembleWeights::default(),
        )
    }

    fn scored(entries: &[(&str, f32)]) -> ScorerOutcome {
        let scores = entries.iter().map(|(s, v)| (s.to_string(), *v)).collect();
        ScorerOutcome::Scored(NormalizedVector::new(scores).unwrap())
    }

    fn failed() -> ScorerOutcome {
        ScorerOutcome::Failed("backend down".to_string())
    }

    #[test]
    fn test_weighted_example() {
        let mut outcomes = Outcomes::new();
        outcomes.insert(ScorerKind::Keyword, scored(&[("😊", 1.0)]));
        outcomes.insert(ScorerKind::Sentiment, scored(&[("😊", 0.5), ("🎉", 1.0)]));
        outcomes.insert(ScorerKind::Semantic, scored(&[("😊", 0.8)]));

        let combined = combiner().combine(Method::Weighted, &outcomes).unwrap();
        assert!((combined["😊"] - 0.745).abs() < 1e-5);
        assert!((combined["🎉"] - 0.35).abs() < 1e-5);
    }

    #[test]
    fn test_weighted_degraded_renormalizes() {
        let mut outcomes = Outcomes::new();
        outcomes.insert(ScorerKind::Keyword, scored(&[("😊", 1.0)]));
        outcomes.insert(ScorerKind::Sentiment, failed());
        outcomes.insert(ScorerKind::Semantic, scored(&[("🎉", 1.0)]));

        let combined = combiner().combine(Method::Weighted, &outcomes).unwrap();
        assert!((combined["😊"] - 0.25 / 0.65).abs() < 1e-5);
        assert!((combined["🎉"] - 0.40 / 0.65).abs() < 1e-5);
    }

    #[test]
    fn test_all_failed_is_no_signal() {
        let mut outcomes = Outcomes::new();
        for kind in ScorerKind::ALL {
            outcomes.insert(kind, failed());
        }
        let err = combiner().combine(Method::Weighted, &outcomes).unwrap_err();
        assert!(matches!(err, VimojiError::NoSignal(_)));
    }

    #[test]
    fn test_passthrough_ignores_other_scorers() {
        let mut outcomes = Outcomes::new();
        outcomes.insert(ScorerKind::Keyword, scored(&[("😊", 0.5)]));
        outcomes.insert(ScorerKind::Semantic, scored(&[("🎉", 1.0)]));

        let combined = combiner().combine(Method::Keyword, &outcomes).unwrap();
        assert_eq!(combined.len(), 1);
        assert_eq!(combined["😊"], 0.5);

        let err = combiner().combine(Method::Sentiment, &outcomes).unwrap_err();
        assert!(matches!(err, VimojiError::NoSignal(_)));
    }

    #[test]
    fn test_max() {
        let mut outcomes = Outcomes::new();
        outcomes.insert(ScorerKind::Keyword, scored(&[("😊", 0.3), ("🎉", 1.0)]));
        outcomes.insert(ScorerKind::Semantic, scored(&[("😊", 0.9)]));

        let combined = combiner().combine(Method::Max, &outcomes).unwrap();
        assert_eq!(combined["😊"], 0.9);
        assert_eq!(combined["🎉"], 1.0);
    }

    #[test]
    fn test_voting_counts_top_three() {
        let mut outcomes = Outcomes::new();
        outcomes.insert(
            ScorerKind::Keyword,
            scored(&[("😊", 1.0), ("🎉", 0.9), ("🥳", 0.8), ("😄", 0.7)]),
        );
        outcomes.insert(ScorerKind::Semantic, scored(&[("😊", 1.0), ("😄", 0.5)]));

        let combined = combiner().combine(Method::Voting, &outcomes).unwrap();
        assert_eq!(combined["😊"], 1.0);
        assert_eq!(combined["🎉"], 0.5);
        assert_eq!(combined["😄"], 0.5);
        assert!(!combined.contains_key("😢"));
    }

    #[test]
    fn test_determinism_under_insertion_order() {
        let entries = [
            (ScorerKind::Semantic, scored(&[("😊", 0.8), ("😢", 0.1)])),
            (ScorerKind::Keyword, scored(&[("😊", 1.0)])),
            (ScorerKind::Sentiment, scored(&[("🎉", 1.0), ("😊", 0.5)])),
        ];
        let forward: Outcomes = entries.iter().cloned().collect();
        let backward: Outcomes = entries.iter().rev().cloned().collect();

        for method in [Method::Weighted, Method::Max, Method::Voting] {
            assert_eq!(
                combiner().combine(method, &forward).unwrap(),
                combiner().combine(method, &backward).unwrap()
            );
        }
    }
}
