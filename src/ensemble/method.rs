//! Suggestion method selectors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, VimojiError};
use crate::scorer::ScorerKind;

/// How a request combines its scorers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Weighted sum of all normalized scorer outputs.
    #[default]
    Weighted,
    /// Keyword scorer only.
    Keyword,
    /// Sentiment scorer only.
    Sentiment,
    /// Semantic scorer only.
    Semantic,
    /// Per-emoji maximum over scorers.
    Max,
    /// Share of scorers that rank the emoji in their top three.
    Voting,
}

impl Method {
    pub const ALL: [Method; 6] = [
        Method::Weighted,
        Method::Keyword,
        Method::Sentiment,
        Method::Semantic,
        Method::Max,
        Method::Voting,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Weighted => "weighted",
            Method::Keyword => "keyword",
            Method::Sentiment => "sentiment",
            Method::Semantic => "semantic",
            Method::Max => "max",
            Method::Voting => "voting",
        }
    }

    /// The single scorer a passthrough method forwards, if any.
    pub fn passthrough(&self) -> Option<ScorerKind> {
        match self {
            Method::Keyword => Some(ScorerKind::Keyword),
            Method::Sentiment => Some(ScorerKind::Sentiment),
            Method::Semantic => Some(ScorerKind::Semantic),
            Method::Weighted | Method::Max | Method::Voting => None,
        }
    }

    /// Scorers this method may invoke, in canonical order.
    pub fn scorers(&self) -> &'static [ScorerKind] {
        match self {
            Method::Keyword => &[ScorerKind::Keyword],
            Method::Sentiment => &[ScorerKind::Sentiment],
            Method::Semantic => &[ScorerKind::Semantic],
            Method::Weighted | Method::Max | Method::Voting => &ScorerKind::ALL,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = VimojiError;

    fn from_str(s: &str) -> Result<Self> {
        let selector = s.trim().to_lowercase();
        Method::ALL
            .iter()
            .copied()
            .find(|method| method.as_str() == selector)
            .ok_or_else(|| {
                VimojiError::invalid_method(format!(
                    "'{s}' (expected one of: weighted, keyword, sentiment, semantic, max, voting)"
                ))
            })
    }
}
