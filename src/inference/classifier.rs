//! Emotion classifier trait definition.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Output of an emotion classification backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Emotion label as reported by the backend (e.g. `"joy"`).
    pub label: String,
    /// Model confidence in `[0, 1]`.
    pub confidence: f32,
    /// Optional intensity multiplier. `None` means neutral scaling (1.0).
    #[serde(default)]
    pub intensity: Option<f32>,
}

impl Classification {
    pub fn new<S: Into<String>>(label: S, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
            intensity: None,
        }
    }

    /// Set the intensity signal.
    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = Some(intensity);
        self
    }
}

/// Emotion classifier trait.
///
/// Implementations wrap an external sentiment/emotion model. The model's
/// identity is configuration; the engine only relies on this contract.
/// Unreachable backends and malformed outputs must be reported as
/// [`VimojiError::Inference`](crate::error::VimojiError::Inference).
pub trait EmotionClassifier: Send + Sync {
    /// Classify the emotion expressed by `text`.
    fn classify(&self, text: &str) -> Result<Classification>;

    /// Get the name of this classifier for debugging and logging.
    fn name(&self) -> &str {
        "unknown"
    }
}
