//! Configuration for the suggestion engine.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::analysis::PreprocessorConfig;
use crate::ensemble::method::Method;
use crate::ensemble::ranker::PaddingPolicy;
use crate::ensemble::weights::EnsembleWeights;
use crate::error::{Result, VimojiError};

/// Configuration for [`SuggestionEngine`](crate::ensemble::SuggestionEngine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Per-method weights of the weighted ensemble.
    pub weights: EnsembleWeights,

    /// Method used when the caller does not pick one.
    pub default_method: Method,

    /// Number of suggestions when the caller does not pick one.
    pub top_k: usize,

    /// Behaviour when fewer than `k` emojis score above zero.
    pub padding: PaddingPolicy,

    /// Deadline for each sentiment/semantic backend call, in milliseconds.
    /// `None` waits indefinitely.
    pub scorer_timeout_ms: Option<u64>,

    /// Run the scorers of one request in parallel.
    pub parallel: bool,

    /// Preprocess request text before scoring.
    pub preprocess: bool,

    /// Preprocessing steps.
    pub preprocessor: PreprocessorConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: EnsembleWeights::default(),
            default_method: Method::Weighted,
            top_k: 3,
            padding: PaddingPolicy::None,
            scorer_timeout_ms: Some(5000),
            parallel: true,
            preprocess: true,
            preprocessor: PreprocessorConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate a configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Set the ensemble weights.
    pub fn with_weights(mut self, weights: EnsembleWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Set the default method.
    pub fn with_default_method(mut self, method: Method) -> Self {
        self.default_method = method;
        self
    }

    /// Set the default number of suggestions.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Set the padding policy.
    pub fn with_padding(mut self, padding: PaddingPolicy) -> Self {
        self.padding = padding;
        self
    }

    /// Set the backend call deadline.
    pub fn with_scorer_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.scorer_timeout_ms = timeout.map(|t| t.as_millis() as u64);
        self
    }

    /// Enable or disable parallel scoring.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Enable or disable preprocessing.
    pub fn with_preprocess(mut self, preprocess: bool) -> Self {
        self.preprocess = preprocess;
        self
    }

    /// Set the preprocessing steps.
    pub fn with_preprocessor(mut self, preprocessor: PreprocessorConfig) -> Self {
        self.preprocessor = preprocessor;
        self
    }

    /// Backend call deadline.
    pub fn scorer_timeout(&self) -> Option<Duration> {
        self.scorer_timeout_ms.map(Duration::from_millis)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        self.weights.validate()?;

        if self.top_k == 0 {
            return Err(VimojiError::config("top_k must be greater than 0"));
        }

        if self.scorer_timeout_ms == Some(0) {
            return Err(VimojiError::config(
                "scorer timeout must be greater than 0 ms (use null to disable it)",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.top_k, 3);
        assert_eq!(config.default_method, Method::Weighted);
        assert_eq!(config.padding, PaddingPolicy::None);
        assert_eq!(config.scorer_timeout(), Some(Duration::from_secs(5)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = EngineConfig::new()
            .with_top_k(5)
            .with_padding(PaddingPolicy::Catalog)
            .with_scorer_timeout(None)
            .with_parallel(false)
            .with_default_method(Method::Voting);
        assert_eq!(config.top_k, 5);
        assert_eq!(config.padding, PaddingPolicy::Catalog);
        assert_eq!(config.scorer_timeout(), None);
        assert!(!config.parallel);
        assert_eq!(config.default_method, Method::Voting);
    }

    #[test]
    fn test_validation() {
        assert!(EngineConfig::new().with_top_k(0).validate().is_err());
        assert!(EngineConfig::new()
            .with_scorer_timeout(Some(Duration::ZERO))
            .validate()
            .is_err());
        assert!(EngineConfig::new()
            .with_weights(EnsembleWeights::new(0.5, -0.5, 1.0))
            .validate()
            .is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"top_k": 5, "padding": "catalog", "default_method": "max"}"#)
                .unwrap();
        assert_eq!(config.top_k, 5);
        assert_eq!(config.padding, PaddingPolicy::Catalog);
        assert_eq!(config.default_method, Method::Max);
        assert_eq!(config.weights, EnsembleWeights::default());
    }

    #[test]
    fn test_from_file_validates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"top_k": 0}}"#).unwrap();
        assert!(matches!(
            EngineConfig::from_file(file.path()),
            Err(VimojiError::Config(_))
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", EngineConfig::default().to_json_pretty().unwrap()).unwrap();
        assert_eq!(EngineConfig::from_file(file.path()).unwrap(), EngineConfig::default());
    }
}
