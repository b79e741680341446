//! Result types returned by the suggestion engine.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::Emotion;
use crate::ensemble::method::Method;
use crate::scorer::ScorerKind;

/// An emoji with its final score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredEmoji {
    pub symbol: String,
    pub score: f32,
}

impl ScoredEmoji {
    pub fn new<S: Into<String>>(symbol: S, score: f32) -> Self {
        Self {
            symbol: symbol.into(),
            score,
        }
    }
}

/// Ranked suggestion list, best first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Suggestion {
    emojis: Vec<ScoredEmoji>,
}

impl Suggestion {
    pub fn new(emojis: Vec<ScoredEmoji>) -> Self {
        Self { emojis }
    }

    pub fn emojis(&self) -> &[ScoredEmoji] {
        &self.emojis
    }

    /// The suggested symbols, best first.
    pub fn symbols(&self) -> Vec<&str> {
        self.emojis.iter().map(|e| e.symbol.as_str()).collect()
    }

    pub fn top(&self) -> Option<&ScoredEmoji> {
        self.emojis.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScoredEmoji> {
        self.emojis.iter()
    }

    pub fn len(&self) -> usize {
        self.emojis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emojis.is_empty()
    }

    pub fn into_inner(self) -> Vec<ScoredEmoji> {
        self.emojis
    }
}

impl<'a> IntoIterator for &'a Suggestion {
    type Item = &'a ScoredEmoji;
    type IntoIter = std::slice::Iter<'a, ScoredEmoji>;

    fn into_iter(self) -> Self::IntoIter {
        self.emojis.iter()
    }
}

/// Emotion reported by the sentiment scorer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectedEmotion {
    pub emotion: Emotion,
    pub confidence: f32,
    pub intensity: f32,
}

/// A suggestion together with the analysis behind it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionDetails {
    /// Request text as received.
    pub text: String,
    /// Text the scorers saw.
    pub preprocessed_text: String,
    pub method: Method,
    pub suggestion: Suggestion,
    /// Top-k of each scorer that produced output, on its normalized scale.
    pub method_suggestions: BTreeMap<ScorerKind, Suggestion>,
    /// Scorers that failed, with the error message.
    pub failed_methods: BTreeMap<ScorerKind, String>,
    pub emotion: Option<DetectedEmotion>,
    pub matched_keywords: Vec<String>,
    pub elapsed_ms: f64,
}

impl SuggestionDetails {
    /// Whether at least one scorer failed.
    pub fn is_degraded(&self) -> bool {
        !self.failed_methods.is_empty()
    }
}
