//! Cue-lexicon emotion classifier.
//!
//! A dependency-free stand-in for a neural emotion model: counts the emotion
//! cue phrases found as whole words in the normalized text and reports the
//! emotion with the most hits.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::analysis::normalize_text;
use crate::catalog::Emotion;
use crate::error::{Result, VimojiError};
use crate::inference::classifier::{Classification, EmotionClassifier};

/// Built-in cue phrases per emotion.
///
/// Short syllables that also occur in neutral compounds ("tin tức",
/// "kinh tế", "lo" in "lo liệu") are listed only in their emotional compound.
pub const BUILTIN_EMOTION_CUES: &[(Emotion, &[&str])] = &[
    (
        Emotion::Joy,
        &[
            "vui", "hạnh phúc", "sung sướng", "tuyệt vời", "chúc mừng", "yêu", "thích",
            "cảm ơn", "giỏi", "xuất sắc", "haha", "hay quá",
        ],
    ),
    (
        Emotion::Sadness,
        &[
            "buồn", "đau lòng", "đau khổ", "thất vọng", "nhớ", "cô đơn", "chán", "mệt mỏi",
            "tiếc", "tội nghiệp", "khóc",
        ],
    ),
    (
        Emotion::Anger,
        &[
            "giận", "tức giận", "tức quá", "tức điên", "bực", "khó chịu", "ghét", "ức chế",
            "điên tiết", "quá đáng",
        ],
    ),
    (
        Emotion::Fear,
        &[
            "sợ", "lo lắng", "lo sợ", "hoang mang", "căng thẳng", "run sợ", "hồi hộp", "rợn",
        ],
    ),
    (
        Emotion::Surprise,
        &[
            "ngạc nhiên", "bất ngờ", "sốc", "không ngờ", "wow", "ủa", "trời ơi", "thật sao",
        ],
    ),
    (
        Emotion::Disgust,
        &["ghê", "kinh tởm", "kinh khủng", "tởm", "dơ", "bẩn", "kỳ cục", "dở tệ", "tệ"],
    ),
    (
        Emotion::Trust,
        &[
            "tin tưởng", "tin cậy", "ủng hộ", "yên tâm", "chắc chắn", "đáng tin", "cố lên",
            "cố gắng",
        ],
    ),
    (
        Emotion::Anticipation,
        &["mong chờ", "mong đợi", "háo hức", "hy vọng", "nóng lòng", "chờ đợi"],
    ),
];

/// Words that strengthen the expressed emotion.
const INTENSIFIERS: &[&str] = &["quá", "lắm", "rất", "cực", "vô cùng", "siêu"];

/// Upper bound on the intensity multiplier.
const MAX_INTENSITY: f32 = 1.5;

static BUILTIN_LEXICON: LazyLock<LexiconEmotionClassifier> = LazyLock::new(|| {
    let cues = BUILTIN_EMOTION_CUES
        .iter()
        .map(|(emotion, cues)| (*emotion, cues.iter().map(|c| c.to_string()).collect()))
        .collect();
    LexiconEmotionClassifier::new(cues).expect("valid built-in emotion cues")
});

/// A cue phrase and its whole-word pattern.
#[derive(Debug, Clone)]
struct Cue {
    phrase: String,
    pattern: Regex,
}

impl Cue {
    fn new(phrase: &str) -> Result<Option<Self>> {
        let phrase = normalize_text(phrase);
        if phrase.is_empty() {
            return Ok(None);
        }
        let pattern = Regex::new(&format!(r"\b{}\b", regex::escape(&phrase)))
            .map_err(|e| VimojiError::config(format!("invalid emotion cue '{phrase}': {e}")))?;
        Ok(Some(Self { phrase, pattern }))
    }
}

/// Emotion classifier backed by cue phrase counting.
#[derive(Debug, Clone)]
pub struct LexiconEmotionClassifier {
    cues: BTreeMap<Emotion, Vec<Cue>>,
}

impl Default for LexiconEmotionClassifier {
    fn default() -> Self {
        BUILTIN_LEXICON.clone()
    }
}

impl LexiconEmotionClassifier {
    /// Create a classifier from custom cue lists.
    ///
    /// Cues are normalized and matched on word boundaries; blank cues are
    /// ignored.
    pub fn new(cues: BTreeMap<Emotion, Vec<String>>) -> Result<Self> {
        let mut compiled = BTreeMap::new();
        for (emotion, list) in cues {
            let mut patterns = Vec::with_capacity(list.len());
            for phrase in &list {
                if let Some(cue) = Cue::new(phrase)? {
                    patterns.push(cue);
                }
            }
            compiled.insert(emotion, patterns);
        }
        Ok(Self { cues: compiled })
    }

    /// Number of cue hits per emotion, in canonical emotion order.
    pub fn cue_hits(&self, text: &str) -> BTreeMap<Emotion, usize> {
        let normalized = normalize_text(text);
        self.cues
            .iter()
            .map(|(emotion, cues)| {
                let hits = cues.iter().filter(|cue| cue.pattern.is_match(&normalized)).count();
                (*emotion, hits)
            })
            .collect()
    }

    /// Cue phrases of `emotion` found in `text`.
    pub fn matched_cues(&self, emotion: Emotion, text: &str) -> Vec<&str> {
        let normalized = normalize_text(text);
        self.cues
            .get(&emotion)
            .map(|cues| {
                cues.iter()
                    .filter(|cue| cue.pattern.is_match(&normalized))
                    .map(|cue| cue.phrase.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn intensity(normalized: &str) -> f32 {
        let exclamations = normalized.matches('!').count();
        let intensifiers = normalized
            .split_whitespace()
            .filter(|word| INTENSIFIERS.contains(word))
            .count();
        (1.0 + 0.1 * (exclamations + intensifiers) as f32).min(MAX_INTENSITY)
    }
}

impl EmotionClassifier for LexiconEmotionClassifier {
    fn classify(&self, text: &str) -> Result<Classification> {
        let hits = self.cue_hits(text);
        let total: usize = hits.values().sum();

        // Earliest emotion in canonical order wins ties.
        let mut best: Option<(Emotion, usize)> = None;
        for (emotion, count) in &hits {
            if best.is_none_or(|(_, best_count)| *count > best_count) {
                best = Some((*emotion, *count));
            }
        }

        let classification = match best {
            Some((emotion, count)) if count > 0 => {
                Classification::new(emotion.as_str(), count as f32 / total as f32)
                    .with_intensity(Self::intensity(&normalize_text(text)))
            }
            // No cue: neutral, the same bucket a 3-star rating maps to.
            _ => Classification::new(Emotion::Trust.as_str(), 0.0),
        };

        Ok(classification)
    }

    fn name(&self) -> &str {
        "lexicon"
    }
}
