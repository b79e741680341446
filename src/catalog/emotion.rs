//! The eight basic emotions of Plutchik's wheel.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::VimojiError;

/// An emotion label produced by a sentiment backend.
///
/// The declaration order is the canonical iteration order used everywhere a
/// deterministic emotion ordering is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Joy,
    Sadness,
    Anger,
    Fear,
    Surprise,
    Disgust,
    Trust,
    Anticipation,
}

impl Emotion {
    /// All emotions in canonical order.
    pub const ALL: [Emotion; 8] = [
        Emotion::Joy,
        Emotion::Sadness,
        Emotion::Anger,
        Emotion::Fear,
        Emotion::Surprise,
        Emotion::Disgust,
        Emotion::Trust,
        Emotion::Anticipation,
    ];

    /// Lowercase label of the emotion.
    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Joy => "joy",
            Emotion::Sadness => "sadness",
            Emotion::Anger => "anger",
            Emotion::Fear => "fear",
            Emotion::Surprise => "surprise",
            Emotion::Disgust => "disgust",
            Emotion::Trust => "trust",
            Emotion::Anticipation => "anticipation",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = VimojiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim().to_lowercase();
        Emotion::ALL
            .iter()
            .copied()
            .find(|emotion| emotion.as_str() == label)
            .ok_or_else(|| VimojiError::invalid_argument(format!("unknown emotion label '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_labels() {
        assert_eq!("joy".parse::<Emotion>().unwrap(), Emotion::Joy);
        assert_eq!(" Anticipation ".parse::<Emotion>().unwrap(), Emotion::Anticipation);
        assert!("happiness".parse::<Emotion>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for emotion in Emotion::ALL {
            assert_eq!(emotion.to_string().parse::<Emotion>().unwrap(), emotion);
        }
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Emotion::Surprise).unwrap();
        assert_eq!(json, "\"surprise\"");
        let parsed: Emotion = serde_json::from_str("\"disgust\"").unwrap();
        assert_eq!(parsed, Emotion::Disgust);
    }
}
