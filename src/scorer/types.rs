//! Shared types for scorers.

use std::fmt;
use std::str::FromStr;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::catalog::Emotion;
use crate::error::{Result, VimojiError};

/// Raw per-emoji scores produced by one scorer.
///
/// The scale is method-specific. A symbol that is absent scores zero.
pub type ScoreVector = AHashMap<String, f32>;

/// The closed set of scoring methods.
///
/// The ordering is the canonical method order used whenever outcomes of
/// several scorers are iterated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScorerKind {
    Keyword,
    Sentiment,
    Semantic,
}

impl ScorerKind {
    /// All kinds in canonical order.
    pub const ALL: [ScorerKind; 3] = [
        ScorerKind::Keyword,
        ScorerKind::Sentiment,
        ScorerKind::Semantic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScorerKind::Keyword => "keyword",
            ScorerKind::Sentiment => "sentiment",
            ScorerKind::Semantic => "semantic",
        }
    }

    /// Ensemble weight of this method before renormalization.
    pub fn default_weight(&self) -> f32 {
        match self {
            ScorerKind::Keyword => 0.25,
            ScorerKind::Sentiment => 0.35,
            ScorerKind::Semantic => 0.40,
        }
    }
}

impl fmt::Display for ScorerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScorerKind {
    type Err = VimojiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "keyword" => Ok(ScorerKind::Keyword),
            "sentiment" => Ok(ScorerKind::Sentiment),
            "semantic" => Ok(ScorerKind::Semantic),
            other => Err(VimojiError::invalid_argument(format!(
                "unknown scorer kind: {other}"
            ))),
        }
    }
}

/// What a scorer based its scores on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Evidence {
    None,
    /// Keyword phrases found in the text, in catalog order.
    Keywords { phrases: Vec<String> },
    /// Emotion detected by the classifier.
    Emotion {
        emotion: Emotion,
        confidence: f32,
        intensity: f32,
    },
}

/// Scores together with the evidence behind them.
#[derive(Debug, Clone)]
pub struct ScoreReport {
    pub scores: ScoreVector,
    pub evidence: Evidence,
}

impl ScoreReport {
    pub fn new(scores: ScoreVector) -> Self {
        Self {
            scores,
            evidence: Evidence::None,
        }
    }

    pub fn with_evidence(mut self, evidence: Evidence) -> Self {
        self.evidence = evidence;
        self
    }
}
