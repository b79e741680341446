//! Adapter for 1–5 star sentiment models.
//!
//! Multilingual review-rating models predict a star rating rather than an
//! emotion. The adapter buckets ratings into emotions:
//!
//! | stars | emotion |
//! |-------|---------|
//! | 1     | anger   |
//! | 2     | sadness |
//! | 3     | trust   |
//! | 4, 5  | joy     |

use crate::catalog::Emotion;
use crate::error::{Result, VimojiError};
use crate::inference::classifier::{Classification, EmotionClassifier};

/// A backend that rates text on a 1–5 star scale.
pub trait StarRater: Send + Sync {
    /// Predict `(stars, probability)` for `text`.
    fn rate(&self, text: &str) -> Result<(u8, f32)>;

    fn name(&self) -> &str {
        "star-rater"
    }
}

/// Emotion classifier built on a [`StarRater`].
#[derive(Debug, Clone)]
pub struct StarRatingClassifier<R> {
    rater: R,
}

impl<R: StarRater> StarRatingClassifier<R> {
    pub fn new(rater: R) -> Self {
        Self { rater }
    }

    /// Emotion bucket for a star rating.
    pub fn emotion_for_stars(stars: u8) -> Option<Emotion> {
        match stars {
            1 => Some(Emotion::Anger),
            2 => Some(Emotion::Sadness),
            3 => Some(Emotion::Trust),
            4 | 5 => Some(Emotion::Joy),
            _ => None,
        }
    }
}

impl<R: StarRater> EmotionClassifier for StarRatingClassifier<R> {
    fn classify(&self, text: &str) -> Result<Classification> {
        let (stars, probability) = self.rater.rate(text)?;
        let emotion = Self::emotion_for_stars(stars).ok_or_else(|| {
            VimojiError::inference(format!(
                "{} returned an out-of-range rating: {stars}",
                self.rater.name()
            ))
        })?;
        Ok(Classification::new(emotion.as_str(), probability))
    }

    fn name(&self) -> &str {
        self.rater.name()
    }
}
