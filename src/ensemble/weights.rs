//! Ensemble method weights.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, VimojiError};
use crate::scorer::ScorerKind;

/// Fixed per-method weights of the weighted ensemble.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnsembleWeights {
    pub keyword: f32,
    pub sentiment: f32,
    pub semantic: f32,
}

impl Default for EnsembleWeights {
    fn default() -> Self {
        Self {
            keyword: ScorerKind::Keyword.default_weight(),
            sentiment: ScorerKind::Sentiment.default_weight(),
            semantic: ScorerKind::Semantic.default_weight(),
        }
    }
}

impl EnsembleWeights {
    pub fn new(keyword: f32, sentiment: f32, semantic: f32) -> Self {
        Self {
            keyword,
            sentiment,
            semantic,
        }
    }

    /// Weight of one method.
    pub fn get(&self, kind: ScorerKind) -> f32 {
        match kind {
            ScorerKind::Keyword => self.keyword,
            ScorerKind::Sentiment => self.sentiment,
            ScorerKind::Semantic => self.semantic,
        }
    }

    /// Validate the weights.
    pub fn validate(&self) -> Result<()> {
        for kind in ScorerKind::ALL {
            let weight = self.get(kind);
            if !weight.is_finite() || weight < 0.0 {
                return Err(VimojiError::config(format!(
                    "{kind} weight must be a non-negative number, got {weight}"
                )));
            }
        }

        if self.keyword + self.sentiment + self.semantic <= 0.0 {
            return Err(VimojiError::config("ensemble weights must not all be zero"));
        }

        Ok(())
    }

    /// Weights rescaled to sum to 1 over `active` methods.
    ///
    /// When every active method has weight zero, the active methods share the
    /// weight equally.
    pub fn renormalized(&self, active: &[ScorerKind]) -> BTreeMap<ScorerKind, f32> {
        let total: f32 = active.iter().map(|kind| self.get(*kind)).sum();
        active
            .iter()
            .map(|kind| {
                let weight = if total > 0.0 {
                    self.get(*kind) / total
                } else {
                    1.0 / active.len() as f32
                };
                (*kind, weight)
            })
            .collect()
    }
}
