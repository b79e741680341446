//! Sentiment scorer.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::catalog::{EmojiCatalog, Emotion};
use crate::error::{Result, VimojiError};
use crate::inference::{Classification, EmotionClassifier, call_with_timeout};
use crate::scorer::Scorer;
use crate::scorer::types::{Evidence, ScoreReport, ScoreVector, ScorerKind};

/// Scores the emoji group of the emotion detected by a classifier.
///
/// Every emoji in the detected emotion's group receives
/// `confidence × intensity`, where a missing intensity counts as 1.0.
pub struct SentimentScorer {
    catalog: Arc<EmojiCatalog>,
    classifier: Arc<dyn EmotionClassifier>,
    timeout: Option<Duration>,
}

impl SentimentScorer {
    pub fn new(catalog: Arc<EmojiCatalog>, classifier: Arc<dyn EmotionClassifier>) -> Self {
        Self {
            catalog,
            classifier,
            timeout: None,
        }
    }

    /// Bound every classifier call by `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Name of the wrapped classifier.
    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }

    fn classify(&self, text: &str) -> Result<Classification> {
        let classifier = Arc::clone(&self.classifier);
        let text = text.to_string();
        call_with_timeout("sentiment", self.timeout, move || classifier.classify(&text))
    }

    /// Check backend output and resolve it to `(emotion, confidence, intensity)`.
    fn validate(&self, classification: &Classification) -> Result<(Emotion, f32, f32)> {
        let emotion: Emotion = classification.label.parse().map_err(|_| {
            VimojiError::inference(format!(
                "{} returned unknown emotion label '{}'",
                self.classifier.name(),
                classification.label
            ))
        })?;

        let confidence = classification.confidence;
        if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
            return Err(VimojiError::inference(format!(
                "{} returned confidence {confidence} outside [0, 1]",
                self.classifier.name()
            )));
        }

        let intensity = classification.intensity.unwrap_or(1.0);
        if !intensity.is_finite() || intensity < 0.0 {
            return Err(VimojiError::inference(format!(
                "{} returned invalid intensity {intensity}",
                self.classifier.name()
            )));
        }

        Ok((emotion, confidence, intensity))
    }
}

impl Scorer for SentimentScorer {
    fn score(&self, text: &str) -> Result<ScoreVector> {
        Ok(self.score_detailed(text)?.scores)
    }

    fn kind(&self) -> ScorerKind {
        ScorerKind::Sentiment
    }

    fn score_detailed(&self, text: &str) -> Result<ScoreReport> {
        let classification = self.classify(text)?;
        let (emotion, confidence, intensity) = self.validate(&classification)?;
        debug!(
            classifier = self.classifier.name(),
            %emotion,
            confidence,
            intensity,
            "emotion classified"
        );

        let value = confidence * intensity;
        let scores = self
            .catalog
            .emotion_group(emotion)
            .iter()
            .map(|symbol| (symbol.clone(), value))
            .collect();

        Ok(ScoreReport::new(scores).with_evidence(Evidence::Emotion {
            emotion,
            confidence,
            intensity,
        }))
    }
}

impl std::fmt::Debug for SentimentScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentimentScorer")
            .field("classifier", &self.classifier.name())
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedClassifier(Classification);

    impl EmotionClassifier for FixedClassifier {
        fn classify(&self, _text: &str) -> Result<Classification> {
            Ok(self.0.clone())
        }
    }

    struct SlowClassifier;

    impl EmotionClassifier for SlowClassifier {
        fn classify(&self, _text: &str) -> Result<Classification> {
            std::thread::sleep(Duration::from_millis(500));
            Ok(Classification::new("joy", 1.0))
        }
    }

    fn scorer_with(classification: Classification) -> SentimentScorer {
        SentimentScorer::new(
            Arc::new(EmojiCatalog::builtin().unwrap()),
            Arc::new(FixedClassifier(classification)),
        )
    }

    #[test]
    fn test_scores_emotion_group() {
        let scorer = scorer_with(Classification::new("sadness", 0.8));
        let scores = scorer.score("buồn").unwrap();
        assert_eq!(scores.len(), 8);
        assert!(scores.values().all(|&v| (v - 0.8).abs() < 1e-6));
        assert!(scores.contains_key("😢"));
    }

    #[test]
    fn test_intensity_scales_confidence() {
        let scorer = scorer_with(Classification::new("Joy", 0.5).with_intensity(1.4));
        let report = scorer.score_detailed("vui").unwrap();
        assert!((report.scores["😊"] - 0.7).abs() < 1e-6);
        assert_eq!(
            report.evidence,
            Evidence::Emotion {
                emotion: Emotion::Joy,
                confidence: 0.5,
                intensity: 1.4
            }
        );
    }

    #[test]
    fn test_malformed_outputs_are_inference_errors() {
        let cases = [
            Classification::new("happiness", 0.9),
            Classification::new("joy", 1.2),
            Classification::new("joy", f32::NAN),
            Classification::new("joy", 0.9).with_intensity(-1.0),
            Classification::new("joy", 0.9).with_intensity(f32::INFINITY),
        ];
        for case in cases {
            let err = scorer_with(case).score("x").unwrap_err();
            assert!(err.is_inference(), "unexpected error: {err}");
        }
    }

    #[test]
    fn test_timeout_is_inference_error() {
        let scorer = SentimentScorer::new(
            Arc::new(EmojiCatalog::builtin().unwrap()),
            Arc::new(SlowClassifier),
        )
        .with_timeout(Some(Duration::from_millis(20)));
        assert!(scorer.score("x").unwrap_err().is_inference());
    }
}
